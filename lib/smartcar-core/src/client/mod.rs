mod auth;
pub use self::auth::{Authentication, SecureString};

mod environment;
pub use self::environment::Environment;

mod error;
pub use self::error::SmartcarError;

mod transport;

pub mod oauth2;
pub use self::oauth2::{
    AuthClient, AuthClientConfig, AuthClientConfigBuilder, AuthUrlOptions, TokenRecord,
    is_expired, is_expired_at,
};

mod api;
pub use self::api::{ApiClient, ApiClientBuilder, VehicleIdsQuery, get_user_id, get_vehicle_ids};
