//! # 파라미터화 체인
//!
//! 매니폴드의 `forward`를 원본 텐서의 미분 가능한 재파라미터화로 연결한다.

pub mod chain;
pub mod registration;
pub mod value;

#[cfg(test)]
mod __tests__;

pub use chain::{Link, Parametrization};
pub use registration::{register, Originals, ParametrizedTensor};
pub use value::Value;
