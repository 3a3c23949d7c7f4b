use super::{
    client::ApiClient,
    types::{ApiError, OrganizationUser, Site},
};

impl ApiClient {
    pub async fn get_sites(&self) -> Result<Vec<Site>, ApiError> {
        self.get_json("/api/v1/auth/site/list/").await
    }

    pub async fn get_organization_users(&self) -> Result<Vec<OrganizationUser>, ApiError> {
        self.get_json("/api/v1/auth/organization/users/").await
    }
}
