//! 앰비언트 공간에서의 사영으로 정의되는 매니폴드

use std::fmt;

use candle_core::Tensor;

use super::abstract_manifold::{maybe_transpose, AbstractManifold, StagedBase};
use super::shape::{Dimensions, ManifoldShape};
use crate::core::error::{ManifoldError, Result};
use crate::core::parametrize::{Link, Parametrization, Value};

/// 앰비언트 텐서를 매니폴드 위의 점으로 보내는 사영
pub trait Projection: fmt::Debug {
    /// `x`는 정규 배치(전치 후)로 들어온다.
    ///
    /// 전사(surjective)여야 한다. 그렇지 않으면 매니폴드의 일부에만 도달한다.
    fn projection(&self, x: &Tensor) -> Result<Tensor>;
}

/// 사영 `P`로 파라미터화되는 매니폴드
#[derive(Debug)]
pub struct EmbeddedManifold<P> {
    shape: ManifoldShape,
    projection: P,
    link: Link,
}

impl<P: Projection> EmbeddedManifold<P> {
    pub fn new(dimensions: Dimensions, size: &[usize], projection: P) -> Result<Self> {
        Ok(Self {
            shape: ManifoldShape::new(dimensions, size)?,
            projection,
            link: Link::new(),
        })
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }
}

impl<P: Projection> Parametrization for EmbeddedManifold<P> {
    fn forward(&self, x: &Value) -> Result<Value> {
        let transpose = self.shape.transpose();
        let x = maybe_transpose(x.single()?.clone(), transpose)?;
        let y = self.projection.projection(&x)?;
        Ok(Value::Single(maybe_transpose(y, transpose)?))
    }

    fn link(&self) -> &Link {
        &self.link
    }

    fn as_manifold(&self) -> Option<&dyn AbstractManifold> {
        Some(self)
    }
}

impl<P: Projection> AbstractManifold for EmbeddedManifold<P> {
    fn shape(&self) -> &ManifoldShape {
        &self.shape
    }

    fn base(&self) -> Option<Tensor> {
        None
    }

    // 사영은 base 점에 의존하지 않으므로 원본을 0으로 만들면 값이 사라진다
    fn stage_base(&self, _x: Option<&Value>) -> Result<StagedBase> {
        Err(ManifoldError::invalid_state(
            "EmbeddedManifold has no base to update",
        ))
    }
}

impl<P> fmt::Display for EmbeddedManifold<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EmbeddedManifold({})", self.shape)
    }
}
