//! Application use cases (business logic orchestration).

pub mod choices;
mod connection_broker;
mod credential_context;
mod error_translator;
mod landing_page;

pub use choices::{
    AVAILABILITY_ZONES_NAMESPACE, ChoiceOptions, ChoicesManager, INSTANCE_TYPES_NAMESPACE,
    KeypairOptions, SubnetOptions, instance_type_label,
};
pub use connection_broker::{ConnectionBroker, ConnectionRequest};
pub use credential_context::CredentialContext;
pub use error_translator::{
    ErrorTranslator, PERMISSION_DENIED_MESSAGE, SESSION_TIMEOUT_MESSAGE, TranslateOptions,
    user_message,
};
pub use landing_page::{LandingOptions, LandingPage, SORT_PARAM};
