//! Business Central automation API calls used by the deployment
//!
//! Every call goes through an [`HttpTransport`] so the request building and
//! response interpretation can be exercised without a network.

pub mod auth;
pub mod companies;
pub mod constants;
pub mod models;
pub mod status;
pub mod transport;
pub mod upload;

pub use auth::authenticate;
pub use companies::resolve_company_id;
pub use constants::Endpoints;
pub use models::{AuthRequest, AuthToken, Company, DeploymentStatusRecord};
pub use status::{fetch_deployment_status, relevant_records};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use upload::upload_artifact;
