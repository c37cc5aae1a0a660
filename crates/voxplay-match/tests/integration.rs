//! End-to-end resolution through the full default strategy stack.

use std::sync::Arc;
use voxplay_core::{Catalog, CatalogItem, ControlAction, MatchTarget, MatchingConfig};
use voxplay_match::{MatchEngine, NullClassifier};

fn item(id: &str, name: &str, transcript: Option<&str>) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        display_name: name.to_string(),
        transcript_text: transcript.map(str::to_string),
    }
}

fn sample_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![
        item(
            "introduction.mp4",
            "introduction",
            Some("大家好，欢迎收看本系列。今天先做一个简单的介绍。"),
        ),
        item(
            "cooking.mp4",
            "cooking",
            Some("这一段我们来做一道家常菜，先把食材准备好。"),
        ),
        item("travel.mp4", "travel", None),
    ]))
}

fn engine_with(classifier: NullClassifier) -> MatchEngine {
    MatchEngine::with_defaults(&MatchingConfig::default(), Arc::new(classifier))
}

#[tokio::test]
async fn test_ordinal_selects_second_item() {
    let engine = engine_with(NullClassifier::new());
    let result = engine
        .resolve("第二个", sample_catalog())
        .await
        .expect("ordinal should match");
    assert_eq!(result.target, MatchTarget::Item(1));
    assert_eq!(result.strategy, "ordinal");
}

#[tokio::test]
async fn test_keyword_outranks_reference_text() {
    // "暂停" appears in an item transcript too; the keyword strategy sits
    // above the reference strategy and must take the control action.
    let catalog = Arc::new(Catalog::new(vec![item(
        "a.mp4",
        "a",
        Some("遇到问题可以先暂停视频再继续"),
    )]));
    let engine = engine_with(NullClassifier::new());
    let result = engine
        .resolve("暂停", catalog)
        .await
        .expect("keyword should match");
    assert_eq!(result.target, MatchTarget::Control(ControlAction::Pause));
    assert_eq!(result.strategy, "keyword");
}

#[tokio::test]
async fn test_identifier_matches_display_name() {
    let engine = engine_with(NullClassifier::new());
    let result = engine
        .resolve("play cooking please", sample_catalog())
        .await
        .expect("identifier should match");
    assert_eq!(result.target, MatchTarget::Item(1));
    assert_eq!(result.strategy, "identifier");
}

#[tokio::test]
async fn test_reference_text_overlap_matches() {
    let engine = engine_with(NullClassifier::new());
    let result = engine
        .resolve("我想看做家常菜的那一段", sample_catalog())
        .await
        .expect("reference text should match");
    assert_eq!(result.target, MatchTarget::Item(1));
    assert_eq!(result.strategy, "reference");
}

#[tokio::test]
async fn test_classifier_fallback_when_lexical_miss() {
    let classifier =
        NullClassifier::with_response(r#"{"index": 2, "confidence": 0.8, "reason": "旅行相关"}"#);
    let engine = engine_with(classifier);
    let result = engine
        .resolve("有没有讲出去玩的", sample_catalog())
        .await
        .expect("classifier should match");
    assert_eq!(result.target, MatchTarget::Item(2));
    assert_eq!(result.strategy, "contextual");
    assert!((result.confidence - 0.8).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_classifier_out_of_range_is_no_match() {
    let classifier = NullClassifier::with_response(r#"{"index": 9, "confidence": 0.9}"#);
    let engine = engine_with(classifier);
    let result = engine.resolve("有没有讲出去玩的", sample_catalog()).await;
    assert!(result.is_none());
}

#[tokio::test]
async fn test_classifier_garbage_is_no_match() {
    let classifier = NullClassifier::with_response("抱歉，我不太确定你想看哪一个。");
    let engine = engine_with(classifier);
    let result = engine.resolve("有没有讲出去玩的", sample_catalog()).await;
    assert!(result.is_none());
}

#[tokio::test]
async fn test_empty_catalog_only_controls_match() {
    let engine = engine_with(NullClassifier::new());
    let catalog = Arc::new(Catalog::default());
    let result = engine
        .resolve("继续播放", Arc::clone(&catalog))
        .await
        .expect("control keywords work without items");
    assert_eq!(result.target, MatchTarget::Control(ControlAction::Resume));
    assert!(engine.resolve("第一个", catalog).await.is_none());
}
