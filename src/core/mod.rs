//! # 매니폴드 재파라미터화 핵심 모듈
//!
//! 가중치를 매니폴드 위에 두면서도 제약 없는 최적화기로 학습할 수 있게 하는 구성 요소들

pub mod error;
pub mod manifold;
pub mod parametrize;

// 주요 타입들 재수출
pub use error::{ManifoldError, Result};
pub use manifold::*;
pub use parametrize::*;

// 각 모듈이 자체 테스트를 포함함
