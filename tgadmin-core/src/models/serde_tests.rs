//! Serde tests for core types.
//!
//! These tests pin the wire names the backend and the settings file rely on.

use serde_json::json;

use crate::{BotStatus, Page, PaymentStatus, Resource, Route, SubscriptionStatus};

// ============================================================================
// Resource / Route
// ============================================================================

#[test]
fn test_resource_wire_names() {
    for resource in Resource::listable() {
        let json = serde_json::to_string(resource).unwrap();
        assert_eq!(json, format!("\"{}\"", resource.as_str()));
    }
}

#[test]
fn test_route_deserialize_lowercase() {
    let route: Route = serde_json::from_str(r#""payments""#).unwrap();
    assert_eq!(route, Route::Payments);
    assert_eq!(route.path(), "/payments");
    assert!(!Route::Login.requires_session());
}

// ============================================================================
// Status Serde Tests
// ============================================================================

#[test]
fn test_status_deserialize_lowercase() {
    let bot: BotStatus = serde_json::from_str(r#""stopped""#).unwrap();
    let sub: SubscriptionStatus = serde_json::from_str(r#""expired""#).unwrap();
    let pay: PaymentStatus = serde_json::from_str(r#""confirmed""#).unwrap();

    assert_eq!(bot, BotStatus::Stopped);
    assert_eq!(sub, SubscriptionStatus::Expired);
    assert_eq!(pay, PaymentStatus::Confirmed);
}

// ============================================================================
// Page Serde Tests
// ============================================================================

#[test]
fn test_page_tolerates_missing_metadata() {
    let page: Page = serde_json::from_value(json!({"items": [], "total": 0})).unwrap();
    assert!(page.is_empty());
    assert!(page.pages.is_none());

    // Optional echoes are not serialized back out when absent.
    let out = serde_json::to_value(&page).unwrap();
    assert!(out.get("pages").is_none());
}

#[test]
fn test_page_preserves_unknown_record_fields() {
    let page: Page = serde_json::from_value(json!({
        "items": [{"id": "p1", "status": "pending", "amount": "19.99", "extra": {"a": 1}}],
        "total": 1
    }))
    .unwrap();

    let out = serde_json::to_value(&page.items[0]).unwrap();
    assert_eq!(out["extra"]["a"], 1);
    assert_eq!(out["amount"], "19.99");
}
