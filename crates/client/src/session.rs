//! Session document emitted by `twingate-notifier resources`.
//!
//! Field names follow the notifier's snake_case JSON. Fields the tray does
//! not strictly need carry serde defaults and accept `null`, so one odd
//! resource never costs the whole session.

use serde::{Deserialize, Deserializer, Serialize};

/// Authenticated user plus the resources reachable on the current network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<Resource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_url: String,
}

impl Session {
    /// Parses the notifier's stdout.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Resources flagged as visible in the client, in notifier order.
    pub fn visible_resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(|r| r.is_visible_in_client)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

impl User {
    /// "First Last", falling back to the email when both names are blank.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Addressing mode of a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Fqdn,
    Ip,
    /// Any mode this build does not know about (CIDR ranges, ...).
    #[default]
    #[serde(other)]
    Other,
}

/// A network resource the user can reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_url: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: ResourceType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_visible_in_client: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_open_in_browser: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub aliases: Vec<Alias>,
    /// Unix timestamp; `<= 0` means expired or never authenticated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub auth_expires_at: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auth_flow_id: String,
}

impl Resource {
    /// Address shown to the user: first alias if any, else the raw address.
    pub fn display_address(&self) -> &str {
        self.aliases
            .first()
            .map(|a| a.address.as_str())
            .filter(|a| !a.is_empty())
            .unwrap_or(self.address.as_str())
    }

    pub fn is_auth_expired(&self) -> bool {
        self.auth_expires_at <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_url: String,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Notifier output with one aliased, one expired and one hidden resource.
    pub const SESSION_JSON: &str = r#"{
        "admin_url": "https://acme.twingate.com",
        "user": {
            "id": "VXNlcjox",
            "email": "ada@acme.test",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "is_admin": true,
            "avatar_url": "https://cdn.acme.test/ada.png"
        },
        "resources": [
            {
                "id": "UmVzb3VyY2U6MQ==",
                "name": "Wiki",
                "address": "10.0.0.5",
                "open_url": "http://wiki.internal",
                "admin_url": "https://acme.twingate.com/resources/1",
                "type": "ip",
                "is_visible_in_client": true,
                "can_open_in_browser": true,
                "aliases": [{ "address": "wiki.internal", "open_url": "http://wiki.internal" }],
                "auth_expires_at": 1893456000,
                "auth_flow_id": ""
            },
            {
                "id": "UmVzb3VyY2U6Mg==",
                "name": "Prod DB",
                "address": "db.prod.internal",
                "open_url": "",
                "admin_url": "https://acme.twingate.com/resources/2",
                "type": "fqdn",
                "is_visible_in_client": true,
                "can_open_in_browser": false,
                "auth_expires_at": 0,
                "auth_flow_id": "flow-2"
            },
            {
                "id": "UmVzb3VyY2U6Mw==",
                "name": "Hidden",
                "address": "hidden.internal",
                "open_url": "",
                "admin_url": "",
                "type": "fqdn",
                "is_visible_in_client": false,
                "can_open_in_browser": false,
                "auth_expires_at": -1,
                "auth_flow_id": ""
            }
        ]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_notifier_output() {
        let session = Session::from_json(fixtures::SESSION_JSON).unwrap();
        assert_eq!(session.admin_url, "https://acme.twingate.com");
        assert_eq!(session.user.email, "ada@acme.test");
        assert!(session.user.is_admin);
        assert_eq!(session.resources.len(), 3);

        let wiki = &session.resources[0];
        assert_eq!(wiki.kind, ResourceType::Ip);
        assert_eq!(wiki.aliases.len(), 1);
        assert_eq!(wiki.auth_expires_at, 1_893_456_000);

        let db = &session.resources[1];
        assert_eq!(db.kind, ResourceType::Fqdn);
        assert!(db.aliases.is_empty());
    }

    #[test]
    fn serialized_session_parses_back_equal() {
        let session = Session::from_json(fixtures::SESSION_JSON).unwrap();
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(Session::from_json(&json).unwrap(), session);
    }

    #[test]
    fn type_field_name() {
        let session = Session::from_json(fixtures::SESSION_JSON).unwrap();
        let json = serde_json::to_value(&session.resources[1]).unwrap();
        assert_eq!(json["type"], "fqdn");
        assert!(json.get("kind").is_none());
        assert!(json.get("aliases").is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"user":{"id":"1","email":"a@b.c","extra":1},"resources":[],"network":"acme"}"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.user.id, "1");
        assert!(session.admin_url.is_empty());
    }

    #[test]
    fn unknown_resource_type_is_kept() {
        let json = r#"{
            "user": {"id": "1", "email": "a@b.c"},
            "resources": [
                {"id": "r1", "name": "Lab", "address": "10.1.0.0/16", "type": "cidr",
                 "is_visible_in_client": true},
                {"id": "r2", "name": "Wiki", "address": "wiki.internal", "type": "fqdn"}
            ]
        }"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.resources.len(), 2);
        assert_eq!(session.resources[0].kind, ResourceType::Other);
        assert_eq!(session.resources[1].kind, ResourceType::Fqdn);
        assert_eq!(session.visible_resources().count(), 1);
    }

    #[test]
    fn null_optional_fields_use_defaults() {
        let json = r#"{
            "admin_url": null,
            "user": {"id": "1", "email": "a@b.c", "first_name": null, "is_admin": null},
            "resources": [
                {"id": "r1", "name": "Wiki", "address": "10.0.0.5", "type": null,
                 "aliases": null, "open_url": null, "auth_expires_at": null,
                 "auth_flow_id": null, "is_visible_in_client": true}
            ]
        }"#;
        let session = Session::from_json(json).unwrap();
        assert!(session.admin_url.is_empty());
        assert!(session.user.first_name.is_empty());
        assert!(!session.user.is_admin);

        let wiki = &session.resources[0];
        assert!(wiki.aliases.is_empty());
        assert!(wiki.open_url.is_empty());
        assert_eq!(wiki.kind, ResourceType::Other);
        assert!(wiki.is_auth_expired());
        assert_eq!(wiki.display_address(), "10.0.0.5");
    }

    #[test]
    fn null_resource_list_is_empty() {
        let session = Session::from_json(r#"{"user":{"id":"1","email":"a@b.c"},"resources":null}"#).unwrap();
        assert!(session.resources.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Session::from_json("not json").is_err());
        assert!(Session::from_json(r#"{"resources":[]}"#).is_err());
    }

    #[test]
    fn display_address_prefers_first_alias() {
        let session = Session::from_json(fixtures::SESSION_JSON).unwrap();
        assert_eq!(session.resources[0].display_address(), "wiki.internal");
        assert_eq!(session.resources[1].display_address(), "db.prod.internal");
    }

    #[test]
    fn auth_expiry() {
        let session = Session::from_json(fixtures::SESSION_JSON).unwrap();
        assert!(!session.resources[0].is_auth_expired());
        assert!(session.resources[1].is_auth_expired());
        assert!(session.resources[2].is_auth_expired());
    }

    #[test]
    fn visible_resources_keep_order() {
        let session = Session::from_json(fixtures::SESSION_JSON).unwrap();
        let names: Vec<_> = session.visible_resources().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Wiki", "Prod DB"]);
    }

    #[test]
    fn user_display_name() {
        let mut user = Session::from_json(fixtures::SESSION_JSON).unwrap().user;
        assert_eq!(user.display_name(), "Ada Lovelace");
        user.first_name.clear();
        user.last_name.clear();
        assert_eq!(user.display_name(), "ada@acme.test");
    }
}
