//! Webhook payloads trimmed down from real `pull_request` deliveries.

pub(crate) const PR_OPENED: &str = r#"{
  "action": "opened",
  "number": 12,
  "pull_request": {
    "url": "https://api.github.com/repos/rtiwari13/inventory-management-application/pulls/12",
    "id": 2048153091,
    "node_id": "PR_kwDOMlS1Ks56EyYD",
    "html_url": "https://github.com/rtiwari13/inventory-management-application/pull/12",
    "number": 12,
    "state": "open",
    "title": "Add stock alerts",
    "user": { "login": "contributor", "id": 1000001, "type": "User" },
    "head": { "ref": "stock-alerts", "sha": "f88f7bd4250b963752d615e491b7e676ce5eb7f0" },
    "base": { "ref": "main", "sha": "a4786471ee4d4e894fec150e426c3551db0f31e0" }
  },
  "repository": {
    "id": 845813034,
    "name": "inventory-management-application",
    "full_name": "rtiwari13/inventory-management-application"
  },
  "sender": { "login": "contributor", "id": 1000001, "type": "User" }
}"#;

pub(crate) const PR_CLOSED: &str = r#"{
  "action": "closed",
  "number": 12,
  "pull_request": {
    "url": "https://api.github.com/repos/rtiwari13/inventory-management-application/pulls/12",
    "number": 12,
    "state": "closed",
    "merged": false
  },
  "repository": {
    "name": "inventory-management-application",
    "full_name": "rtiwari13/inventory-management-application"
  },
  "sender": { "login": "contributor", "id": 1000001, "type": "User" }
}"#;
