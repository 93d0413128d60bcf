//! 매니폴드 파라미터화 오류 정의
//!
//! 모든 오류는 호출 계약 위반이므로 감지된 지점에서 즉시 반환된다.

/// 매니폴드 계층과 파라미터화 체인에서 발생하는 오류
#[derive(Debug, thiserror::Error)]
pub enum ManifoldError {
    /// 잘못된 인자 (`dimensions` 값, 입력 개수 불일치, 형상 불일치 등)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 매니폴드가 필요한 자리에 매니폴드가 아닌 객체가 전달됨
    #[error("Expecting {expected} to be an AbstractManifold. Got '{found}'")]
    TypeMismatch {
        /// 기대한 역할 (예: `total_space`)
        expected: &'static str,
        /// 실제로 전달된 타입 이름
        found: String,
    },

    /// 현재 상태에서 허용되지 않는 호출 (등록 전 base 갱신 등)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// candle 텐서 연산 오류
    #[error(transparent)]
    Tensor(#[from] candle_core::Error),
}

impl ManifoldError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// 호출자의 계약 위반인지 (텐서 엔진 내부 오류가 아닌지) 확인
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::Tensor(_))
    }
}

pub type Result<T> = std::result::Result<T, ManifoldError>;
