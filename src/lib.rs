//! 매니폴드 재파라미터화 라이브러리
//!
//! 네트워크 가중치를 직교 행렬, 구면, 그 곱 같은 매끄러운 매니폴드 위에 두도록
//! 재파라미터화한다. 재파라미터화는 미분 가능하므로 제약 없는 최적화기로 학습된다.

pub mod core;

// 핵심 모듈들 재수출
pub use crate::core::{
    // 오류
    ManifoldError, Result,
    // 파라미터화 체인
    register, Link, Originals, Parametrization, ParametrizedTensor, Value,
    // 매니폴드
    AbstractManifold, Dim, Dimensions, EmbeddedManifold, Fibration, FibrationMap, Manifold,
    ManifoldOptions, ManifoldShape, ProductManifold, Projection, StagedBase, Trivialization,
    // 버퍼 저장
    buffers_of, load_buffers, save_buffers,
};
pub use crate::core::manifold::checkpoint;
