// ── User profile ──

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use surveydesk_api::{ApiResponse, FormPart};

use super::EntityId;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(alias = "_id")]
    pub id: EntityId,
    #[serde(alias = "name")]
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "avatar")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// An image attached to a profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields of `PUT /users/profile`. Unset fields are left out of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<AvatarUpload>,
}

impl ProfileUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.avatar.is_none()
    }

    /// Multipart parts in the field order the backend expects.
    pub fn into_form(self) -> Vec<FormPart> {
        let mut parts = Vec::new();
        if let Some(name) = self.full_name {
            parts.push(FormPart::text("fullName", name));
        }
        if let Some(email) = self.email {
            parts.push(FormPart::text("email", email));
        }
        if let Some(phone) = self.phone {
            parts.push(FormPart::text("phone", phone));
        }
        if let Some(avatar) = self.avatar {
            parts.push(FormPart::File {
                name: "avatar".into(),
                file_name: avatar.file_name,
                content_type: avatar.content_type,
                bytes: avatar.bytes,
            });
        }
        parts
    }
}

/// Success payload of a profile update. The backend reissues the access
/// token when identity fields change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdated {
    #[serde(alias = "profile")]
    pub user: Profile,
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
}

/// Result of a profile update: the envelope plus any rotated token.
///
/// Persisting `new_token` (session, keyring, cookie) is the caller's job.
#[derive(Debug)]
pub struct ProfileUpdate {
    pub response: ApiResponse<Profile>,
    pub new_token: Option<SecretString>,
}

impl ProfileUpdate {
    pub fn from_response(response: ApiResponse<ProfileUpdated>) -> Self {
        let mut new_token = None;
        let response = response.map(|updated| {
            new_token = updated
                .access_token
                .filter(|t| !t.is_empty())
                .map(SecretString::from);
            updated.user
        });
        Self {
            response,
            new_token,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn rotated_token_is_split_from_the_envelope() {
        let raw = r#"{"success":true,"statusCode":200,"message":"ok",
            "data":{"user":{"id":"u1","fullName":"Ada","email":"ada@example.com"},"token":"t-2"}}"#;
        let response: ApiResponse<ProfileUpdated> = serde_json::from_str(raw).unwrap();
        let update = ProfileUpdate::from_response(response);

        assert_eq!(update.new_token.unwrap().expose_secret(), "t-2");
        assert_eq!(update.response.data().unwrap().full_name, "Ada");
    }

    #[test]
    fn form_skips_unset_fields() {
        let request = ProfileUpdateRequest {
            phone: Some("555".into()),
            ..Default::default()
        };
        let parts = request.into_form();
        assert_eq!(parts.len(), 1);
        assert!(matches!(&parts[0], FormPart::Text { name, value } if name == "phone" && value == "555"));
        assert!(ProfileUpdateRequest::default().is_empty());
    }
}
