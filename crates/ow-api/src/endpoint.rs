use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiResult;

/// Default vendor endpoints.
pub mod endpoints {
    pub const AUTHORIZE: &str = "https://auth.tesla.com/oauth2/v3/authorize";
    pub const TOKEN: &str = "https://auth.tesla.com/oauth2/v3/token";
    pub const ORDERS: &str = "https://owner-api.teslamotors.com/api/1/users/orders";
    pub const TASKS: &str = "https://akamai-apigateway-vfx.tesla.com/tasks";
}

pub const CLIENT_ID: &str = "ownerapi";
pub const REDIRECT_URI: &str = "https://auth.tesla.com/void/callback";
pub const SCOPE: &str = "openid email offline_access";
pub const CODE_CHALLENGE_METHOD: &str = "S256";
/// The task gateway requires an app version but does not check it strictly.
pub const APP_VERSION: &str = "9.99.9-9999";

/// Base URLs the clients talk to. Overridable for testing against a local
/// stand-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub authorize: String,
    pub token: String,
    pub orders: String,
    pub tasks: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize: endpoints::AUTHORIZE.into(),
            token: endpoints::TOKEN.into(),
            orders: endpoints::ORDERS.into(),
            tasks: endpoints::TASKS.into(),
        }
    }
}

/// Language and country sent with order detail requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".into(),
            country: "DE".into(),
        }
    }
}

impl Endpoints {
    /// Task-details URL for one order.
    pub fn order_details_url(&self, reference_number: &str, locale: &Locale) -> ApiResult<Url> {
        let url = Url::parse_with_params(
            &self.tasks,
            &[
                ("deviceLanguage", locale.language.as_str()),
                ("deviceCountry", locale.country.as_str()),
                ("referenceNumber", reference_number),
                ("appVersion", APP_VERSION),
            ],
        )?;
        Ok(url)
    }
}
