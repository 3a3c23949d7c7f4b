use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    client::{decode_json, ApiClient},
    types::{
        ApiError, Board, BoardList, CreateBoardRequest, CreateListRequest, MoveCardRequest,
        ReorderCardRequest, ReorderListRequest, ResponseBody,
    },
};

/// Collections may come back as an empty body; that reads as no items.
fn items_or_empty<T: DeserializeOwned>(body: ResponseBody) -> Result<Vec<T>, ApiError> {
    match body.into_json()? {
        Value::Null => Ok(Vec::new()),
        value => decode_json(ResponseBody::Json(value)),
    }
}

impl ApiClient {
    pub async fn get_boards(&self) -> Result<Vec<Board>, ApiError> {
        items_or_empty(self.get("/api/v1/boards/", &[]).await?)
    }

    pub async fn create_board(&self, title: &str) -> Result<Board, ApiError> {
        self.post_json(
            "/api/v1/boards/",
            &CreateBoardRequest {
                title: title.to_string(),
            },
        )
        .await
    }

    pub async fn get_board(&self, board_id: &str) -> Result<Board, ApiError> {
        self.get_json(&format!("/api/v1/boards/{}/", board_id))
            .await
    }

    pub async fn get_board_lists(&self, board_id: &str) -> Result<Vec<BoardList>, ApiError> {
        items_or_empty(
            self.get(&format!("/api/v1/boards/{}/lists/", board_id), &[])
                .await?,
        )
    }

    pub async fn create_list(
        &self,
        board_id: &str,
        request: &CreateListRequest,
    ) -> Result<BoardList, ApiError> {
        self.post_json(&format!("/api/v1/boards/{}/lists/", board_id), request)
            .await
    }

    pub async fn reorder_list(&self, list_id: &str, order: usize) -> Result<(), ApiError> {
        self.post(
            &format!("/api/v1/lists/{}/reorder/", list_id),
            Some(&ReorderListRequest { order }),
            &[],
        )
        .await?;
        Ok(())
    }

    pub async fn reorder_card(
        &self,
        card_id: &str,
        list_id: &str,
        order: usize,
    ) -> Result<(), ApiError> {
        self.post(
            &format!("/api/v1/cards/{}/reorder/", card_id),
            Some(&ReorderCardRequest {
                list_id: list_id.to_string(),
                order,
            }),
            &[],
        )
        .await?;
        Ok(())
    }

    pub async fn move_card(
        &self,
        card_id: &str,
        source_list_id: &str,
        dest_list_id: &str,
        order: usize,
    ) -> Result<(), ApiError> {
        self.post(
            &format!("/api/v1/cards/{}/move/", card_id),
            Some(&MoveCardRequest {
                source_list_id: source_list_id.to_string(),
                dest_list_id: dest_list_id.to_string(),
                order,
            }),
            &[],
        )
        .await?;
        Ok(())
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/v1/lists/{}/", list_id), &[])
            .await?;
        Ok(())
    }

    pub async fn delete_card(&self, card_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/v1/cards/{}/", card_id), &[])
            .await?;
        Ok(())
    }
}
