use serde::{Deserialize, Serialize};
use mongodb::bson::DateTime as BsonDateTime;

/// Documento da collection de usuários
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,  // PRIMARY IDENTIFIER - único
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nickname: String,
    // Contas antigas só têm `password` em texto puro; hash vazio nunca confere
    #[serde(default)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
}

/// Perfil público (sem hash de senha)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub nickname: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone().unwrap_or_else(|| user.id.clone()),
            nickname: user.nickname.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_legacy_document_without_hash_decodes() {
        let user: User = from_document(doc! {
            "id": "luna",
            "nickname": "moon",
            "password": "pw"
        })
        .unwrap();

        assert_eq!(user.id, "luna");
        assert!(user.password_hash.is_empty());
        assert!(!crate::utils::verify_password("pw", &user.password_hash));
    }
}
