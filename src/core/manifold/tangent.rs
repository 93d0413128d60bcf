//! 접공간 자명화(trivialization)로 정의되는 매니폴드
//!
//! base 점 B에서의 접공간 T_B M 위 텐서를 매니폴드 위의 점으로 보낸다.
//! B는 최적화 도중 주기적으로 현재 점으로 옮겨서 국소 좌표가
//! 원점에서 멀어지지 않게 한다.

use std::fmt;

use candle_core::{Tensor, Var};

use super::abstract_manifold::{
    buffer_name, fit_to_buffer, maybe_transpose, AbstractManifold, StagedBase,
};
use super::options::ManifoldOptions;
use super::shape::{Dimensions, ManifoldShape};
use crate::core::error::Result;
use crate::core::parametrize::{Link, Parametrization, Value};

/// 접공간에서 매니폴드로의 사상
pub trait Trivialization: fmt::Debug {
    /// `x`와 `base` 모두 정규 배치(전치 후)로 들어온다.
    ///
    /// 전사여야 한다. 그렇지 않으면 매니폴드의 일부에만 도달한다.
    fn trivialization(&self, x: &Tensor, base: &Tensor) -> Result<Tensor>;
}

/// base 점 주위의 자명화 `T`로 파라미터화되는 매니폴드
#[derive(Debug)]
pub struct Manifold<T> {
    shape: ManifoldShape,
    trivialization: T,
    /// 정규 배치로 저장된 base 점. `update_base`에서만 제자리 갱신
    base: Var,
    link: Link,
}

impl<T: Trivialization> Manifold<T> {
    pub fn new(dimensions: Dimensions, size: &[usize], trivialization: T) -> Result<Self> {
        Self::with_options(dimensions, size, trivialization, &ManifoldOptions::default())
    }

    /// base 버퍼의 자료형/장치를 지정해서 생성
    ///
    /// base는 0으로 채워진 채 할당되고 `update_base` 전까지는 의미 없는 값이다.
    pub fn with_options(
        dimensions: Dimensions,
        size: &[usize],
        trivialization: T,
        options: &ManifoldOptions,
    ) -> Result<Self> {
        let shape = ManifoldShape::new(dimensions, size)?;
        let base = Var::zeros(shape.canonical_size()?, options.dtype, &options.device)?;
        Ok(Self {
            shape,
            trivialization,
            base,
            link: Link::new(),
        })
    }

    pub fn trivialization(&self) -> &T {
        &self.trivialization
    }
}

impl<T: Trivialization> Parametrization for Manifold<T> {
    fn forward(&self, x: &Value) -> Result<Value> {
        let transpose = self.shape.transpose();
        let x = maybe_transpose(x.single()?.clone(), transpose)?;
        let base = self.base.as_tensor().detach();
        let y = self.trivialization.trivialization(&x, &base)?;
        Ok(Value::Single(maybe_transpose(y, transpose)?))
    }

    fn link(&self) -> &Link {
        &self.link
    }

    fn as_manifold(&self) -> Option<&dyn AbstractManifold> {
        Some(self)
    }
}

impl<T: Trivialization> AbstractManifold for Manifold<T> {
    fn shape(&self) -> &ManifoldShape {
        &self.shape
    }

    fn base(&self) -> Option<Tensor> {
        Some(self.base.as_tensor().detach())
    }

    /// 체인의 현재 값(`x`가 주어지면 `x`를 원본 입력으로 본 값)을 새 base로 계산한다.
    ///
    /// 평가 결과는 테이프에서 분리되고 정규 배치로 돌려진다.
    fn stage_base(&self, x: Option<&Value>) -> Result<StagedBase> {
        let point = self.evaluate(x)?.into_single()?.detach();
        let point = maybe_transpose(point, self.shape.transpose())?;
        Ok(vec![(self.base.clone(), fit_to_buffer(point, &self.base)?)])
    }

    fn buffers(&self, prefix: &str) -> Vec<(String, Var)> {
        vec![(buffer_name(prefix, "base"), self.base.clone())]
    }
}

impl<T> fmt::Display for Manifold<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Manifold({})", self.shape)
    }
}
