use serde::{Deserialize, Serialize};

use crate::{FetchError, Result};

/// Application-level success code inside an [`Envelope`].
pub const SUCCESS_CODE: i64 = 200;

/// Backend response wrapper: `{"code": 200, "msg": "...", "data": ...}`.
///
/// `code` is independent of the HTTP status; an HTTP 200 can carry a
/// failing envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Returns the payload, or [`FetchError::Api`] when `code != 200`.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(FetchError::Api {
                code: self.code,
                msg: self.msg,
            })
        }
    }

    /// Like [`Envelope::into_result`] but a missing `data` is a decode error.
    pub fn into_data(self) -> Result<T> {
        self.into_result()?
            .ok_or_else(|| FetchError::Decode("missing data in successful envelope".to_owned()))
    }
}
