//! Unit tests for consumer group resolution. No network.

use super::*;

fn service(groups: &[&str]) -> TitanTakeoffEmbed {
    TitanTakeoffEmbed {
        client: TakeoffClient::new("http://localhost", 3000, 3001).unwrap(),
        embed_consumer_groups: groups.iter().map(|g| g.to_string()).collect(),
        consumer_group: None,
    }
}

#[test]
fn test_no_groups_defaults_to_primary() {
    assert_eq!(service(&[]).resolve_consumer_group(None).unwrap(), "primary");
}

#[test]
fn test_single_group_is_used() {
    assert_eq!(service(&["embed"]).resolve_consumer_group(None).unwrap(), "embed");
}

#[test]
fn test_multiple_groups_require_a_choice() {
    let svc = service(&["embed", "rerank"]);
    let err = svc.resolve_consumer_group(None).unwrap_err();
    assert!(matches!(err, TakeoffError::MissingConsumerGroup(_)));
    assert_eq!(svc.resolve_consumer_group(Some("rerank")).unwrap(), "rerank");
}

#[test]
fn test_explicit_group_wins() {
    assert_eq!(service(&["embed"]).resolve_consumer_group(Some("other")).unwrap(), "other");
    assert_eq!(service(&["embed"]).resolve_consumer_group(Some("")).unwrap(), "embed");
}
