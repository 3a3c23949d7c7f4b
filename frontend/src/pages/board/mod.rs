use leptos::*;
use std::rc::Rc;

pub mod coordinator;
pub mod ordering;
pub mod repository;

pub use coordinator::{BoardCoordinator, BoardState, PendingSave, ReorderOutcome};
pub use repository::BoardRepository;

use crate::{api::BoardList, components::layout::LoadingSpinner, state::app::use_services};

#[component]
pub fn BoardColumns(#[prop(into)] lists: MaybeSignal<Vec<BoardList>>) -> impl IntoView {
    view! {
        <div class="flex gap-4 overflow-x-auto p-4">
            {move || {
                lists
                    .get()
                    .into_iter()
                    .map(|list| {
                        view! {
                            <section
                                class="w-72 shrink-0 rounded bg-surface-muted p-3"
                                data-list-id=list.id.clone()
                            >
                                <h2 class="font-semibold text-fg mb-2">{list.title.clone()}</h2>
                                <ul class="space-y-2">
                                    {list
                                        .cards
                                        .into_iter()
                                        .map(|card| {
                                            view! {
                                                <li
                                                    class="rounded bg-surface-elevated p-2 shadow-sm"
                                                    data-card-id=card.id
                                                >
                                                    {card.title}
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            </section>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
pub fn BoardPage(#[prop(into)] board_id: String) -> impl IntoView {
    let services = use_services();
    let board = Rc::new(BoardCoordinator::new(BoardRepository::new_with_client(
        services.client.clone(),
    )));
    let state = create_rw_signal(None::<BoardState>);
    let error = create_rw_signal(None::<String>);
    board.subscribe(move |snapshot| state.set(Some(snapshot)));
    // Drag handlers below reach the coordinator through context.
    provide_context(board.clone());

    spawn_local(async move {
        if let Err(err) = board.load_board(&board_id).await {
            log::error!("Failed to load board {}: {}", board_id, err);
            error.set(Some(err.user_message()));
        }
    });

    let lists = Signal::derive(move || state.get().map(|s| s.lists).unwrap_or_default());
    view! {
        {move || {
            error
                .get()
                .map(|msg| {
                    view! {
                        <div class="bg-status-error-bg text-status-error-text px-4 py-3 rounded mb-4">
                            {msg}
                        </div>
                    }
                })
        }}
        <Show
            when=move || state.get().is_some()
            fallback=move || {
                if error.get().is_some() {
                    ().into_view()
                } else {
                    view! { <LoadingSpinner /> }.into_view()
                }
            }
        >
            <BoardColumns lists=lists />
        </Show>
    }
}
