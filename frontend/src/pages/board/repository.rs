use crate::api::{ApiClient, ApiError, Board, BoardList, CreateListRequest};
use std::rc::Rc;

use super::ordering::{CardMove, ListMove};

#[derive(Clone)]
pub struct BoardRepository {
    client: Rc<ApiClient>,
}

impl BoardRepository {
    pub fn new_with_client(client: Rc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.client.get_boards().await
    }

    pub async fn create_board(&self, title: &str) -> Result<Board, ApiError> {
        self.client.create_board(title).await
    }

    pub async fn board(&self, board_id: &str) -> Result<Board, ApiError> {
        self.client.get_board(board_id).await
    }

    pub async fn lists(&self, board_id: &str) -> Result<Vec<BoardList>, ApiError> {
        self.client.get_board_lists(board_id).await
    }

    pub async fn create_list(&self, board_id: &str, title: &str) -> Result<BoardList, ApiError> {
        self.client
            .create_list(
                board_id,
                &CreateListRequest {
                    title: title.to_string(),
                },
            )
            .await
    }

    pub async fn save_list_move(&self, change: &ListMove) -> Result<(), ApiError> {
        self.client
            .reorder_list(&change.list_id, change.order)
            .await
    }

    pub async fn save_card_move(&self, change: &CardMove) -> Result<(), ApiError> {
        match change {
            CardMove::WithinList {
                card_id,
                list_id,
                order,
            } => self.client.reorder_card(card_id, list_id, *order).await,
            CardMove::AcrossLists {
                card_id,
                source_list_id,
                dest_list_id,
                order,
            } => {
                self.client
                    .move_card(card_id, source_list_id, dest_list_id, *order)
                    .await
            }
        }
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
        self.client.delete_list(list_id).await
    }

    pub async fn delete_card(&self, card_id: &str) -> Result<(), ApiError> {
        self.client.delete_card(card_id).await
    }
}
