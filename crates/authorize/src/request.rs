use crate::error::AuthorizeError;
use multichain_rpc::request::RequestParams;
use serde_json::{Map, Value};

const REQUIRED_SCOPES: &str = "requiredScopes";
const OPTIONAL_SCOPES: &str = "optionalScopes";
const SESSION_PROPERTIES: &str = "sessionProperties";
const PARAM_NAMES: [&str; 3] = [REQUIRED_SCOPES, OPTIONAL_SCOPES, SESSION_PROPERTIES];

/// A session authorization request, normalized from positional or keyed parameters.
///
/// Scope maps are kept raw here since malformed entries are filtered during negotiation rather
/// than failing the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub required_scopes: Option<Map<String, Value>>,
    pub optional_scopes: Option<Map<String, Value>>,
    pub session_properties: Option<Map<String, Value>>,
}

impl AuthorizationRequest {
    /// Normalizes `[requiredScopes, optionalScopes, sessionProperties]` or
    /// `{ requiredScopes, optionalScopes, sessionProperties }`.
    ///
    /// Any further parameter is rejected, `null` counts as absent.
    pub fn from_params(params: RequestParams) -> Result<Self, AuthorizeError> {
        match params {
            RequestParams::None => Ok(Self::default()),
            RequestParams::Array(values) => Self::from_positional(values),
            RequestParams::Object(map) => Self::from_keyed(map),
        }
    }

    fn from_positional(values: Vec<Value>) -> Result<Self, AuthorizeError> {
        if values.len() > PARAM_NAMES.len() {
            return Err(AuthorizeError::UnexpectedParams("params[3]".to_string()));
        }
        let mut values = values.into_iter();
        Ok(Self {
            required_scopes: object_param(REQUIRED_SCOPES, values.next())?,
            optional_scopes: object_param(OPTIONAL_SCOPES, values.next())?,
            session_properties: object_param(SESSION_PROPERTIES, values.next())?,
        })
    }

    fn from_keyed(mut map: Map<String, Value>) -> Result<Self, AuthorizeError> {
        if let Some(key) = map.keys().find(|key| !PARAM_NAMES.contains(&key.as_str())) {
            return Err(AuthorizeError::UnexpectedParams(key.clone()));
        }
        Ok(Self {
            required_scopes: object_param(REQUIRED_SCOPES, map.remove(REQUIRED_SCOPES))?,
            optional_scopes: object_param(OPTIONAL_SCOPES, map.remove(OPTIONAL_SCOPES))?,
            session_properties: object_param(SESSION_PROPERTIES, map.remove(SESSION_PROPERTIES))?,
        })
    }
}

fn object_param(
    name: &str,
    value: Option<Value>,
) -> Result<Option<Map<String, Value>>, AuthorizeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(AuthorizeError::InvalidParams(format!("`{name}` must be an object"))),
    }
}
