//! # 매니폴드 계층
//!
//! 형상 기록(`ManifoldShape`) 위에 네 가지 매니폴드 종류를 둔다.
//! - `EmbeddedManifold`: 앰비언트 공간에서의 사영
//! - `Manifold`: base 점 주위의 접공간 자명화
//! - `Fibration`: 전체 공간 + 임베딩 + 파이브레이션 사상
//! - `ProductManifold`: 독립 매니폴드들의 곱

pub mod abstract_manifold;
pub mod checkpoint;
pub mod embedded;
pub mod fibration;
pub mod options;
pub mod product;
pub mod shape;
pub mod tangent;

#[cfg(test)]
pub(crate) mod __tests__;

pub use abstract_manifold::{AbstractManifold, StagedBase};
pub use checkpoint::{buffers_of, load_buffers, save_buffers};
pub use embedded::{EmbeddedManifold, Projection};
pub use fibration::{Fibration, FibrationMap};
pub use options::ManifoldOptions;
pub use product::ProductManifold;
pub use shape::{Dim, Dimensions, ManifoldShape};
pub use tangent::{Manifold, Trivialization};
