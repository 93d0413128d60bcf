//! 체인을 흐르는 값: 단일 텐서 또는 순서 있는 튜플

use candle_core::Tensor;

use crate::core::error::{ManifoldError, Result};

/// 파라미터화 체인의 한 단계가 주고받는 값
///
/// 곱 매니폴드나 파이브레이션은 여러 텐서를 한 번에 다루므로
/// 단일 텐서와 (중첩 가능한) 튜플을 함께 표현한다.
#[derive(Debug, Clone)]
pub enum Value {
    Single(Tensor),
    Tuple(Vec<Value>),
}

impl Value {
    /// 단일 텐서 참조. 튜플이면 오류
    pub fn single(&self) -> Result<&Tensor> {
        match self {
            Value::Single(t) => Ok(t),
            Value::Tuple(xs) => Err(ManifoldError::invalid_argument(format!(
                "expected a single tensor, got a tuple of {} values",
                xs.len()
            ))),
        }
    }

    pub fn into_single(self) -> Result<Tensor> {
        match self {
            Value::Single(t) => Ok(t),
            Value::Tuple(xs) => Err(ManifoldError::invalid_argument(format!(
                "expected a single tensor, got a tuple of {} values",
                xs.len()
            ))),
        }
    }

    /// 튜플 원소들. 단일 텐서는 길이 1 슬라이스로 본다
    pub fn tuple(&self) -> &[Value] {
        match self {
            Value::Single(_) => std::slice::from_ref(self),
            Value::Tuple(xs) => xs,
        }
    }

    /// 함수 인자처럼 펼친 개수 (`f(*X)`에서 X의 길이)
    pub fn len(&self) -> usize {
        self.tuple().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    /// 모든 텐서를 그래디언트 테이프에서 분리
    pub fn detach(&self) -> Value {
        match self {
            Value::Single(t) => Value::Single(t.detach()),
            Value::Tuple(xs) => Value::Tuple(xs.iter().map(Value::detach).collect()),
        }
    }

    /// 펼친 텐서 목록 (깊이 우선, 순서 보존)
    pub fn tensors(&self) -> Vec<&Tensor> {
        let mut out = Vec::new();
        self.collect_tensors(&mut out);
        out
    }

    fn collect_tensors<'a>(&'a self, out: &mut Vec<&'a Tensor>) {
        match self {
            Value::Single(t) => out.push(t),
            Value::Tuple(xs) => xs.iter().for_each(|x| x.collect_tensors(out)),
        }
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Value::Single(t)
    }
}

impl From<&Tensor> for Value {
    fn from(t: &Tensor) -> Self {
        Value::Single(t.clone())
    }
}

impl From<Vec<Tensor>> for Value {
    fn from(ts: Vec<Tensor>) -> Self {
        Value::Tuple(ts.into_iter().map(Value::Single).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(xs: Vec<Value>) -> Self {
        Value::Tuple(xs)
    }
}
