//! Tests for [`fake_embedding::DeterministicFakeEmbedding`].
//!
//! All local: checks size, determinism, value range and batch/single agreement.

use embedding::EmbeddingService;
use fake_embedding::DeterministicFakeEmbedding;

/// **Test: Same text, same vector; different text, different vector.**
#[tokio::test]
async fn test_fake_embedding_is_deterministic() {
    let service = DeterministicFakeEmbedding::new(16);
    let a = service.embed("What is 2 + 2?").await.unwrap();
    let b = DeterministicFakeEmbedding::new(16)
        .embed("What is 2 + 2?")
        .await
        .unwrap();
    let c = service.embed("What is 2 + 3?").await.unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

/// **Test: Sizes that are not a multiple of a digest block are honored.**
///
/// **Expected:** Length equals `size`; every component lies in `[-1, 1)`; a longer vector
/// starts with the shorter one.
#[tokio::test]
async fn test_fake_embedding_size_and_range() {
    for size in [1, 7, 8, 9, 768] {
        let vector = DeterministicFakeEmbedding::new(size).embed("hello").await.unwrap();
        assert_eq!(vector.len(), size);
        assert!(vector.iter().all(|v| (-1.0..1.0).contains(v)));
    }
    let short = DeterministicFakeEmbedding::new(9).vector_for("hello");
    let long = DeterministicFakeEmbedding::new(20).vector_for("hello");
    assert_eq!(&long[..9], &short[..]);
}

/// **Test: Batch results match single calls, in order.**
#[tokio::test]
async fn test_fake_embedding_batch() {
    let service = DeterministicFakeEmbedding::new(4);
    let texts = vec!["a".to_string(), "b".to_string(), "a".to_string()];
    let batch = service.embed_batch(&texts).await.unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0], service.embed("a").await.unwrap());
    assert_eq!(batch[1], service.embed("b").await.unwrap());
    assert_eq!(batch[0], batch[2]);
    assert!(service.embed_batch(&[]).await.unwrap().is_empty());
}

/// **Test: Zero size yields empty vectors.**
#[tokio::test]
async fn test_fake_embedding_zero_size() {
    let service = DeterministicFakeEmbedding::new(0);
    assert!(service.embed("x").await.unwrap().is_empty());
    assert_eq!(service.size(), 0);
}
