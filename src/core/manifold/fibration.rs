//! 전체 공간(total space)에서의 사영으로 정의되는 매니폴드
//!
//! 데이터 흐름: 원본 입력 → 임베딩 → 전체 공간 매니폴드 → 파이브레이션 사상 → 출력

use std::fmt;
use std::rc::Rc;

use candle_core::{Tensor, Var};

use super::abstract_manifold::{
    buffer_name, maybe_transpose, transpose_value, AbstractManifold, StagedBase,
};
use super::shape::{Dimensions, ManifoldShape};
use crate::core::error::{ManifoldError, Result};
use crate::core::parametrize::{Link, Parametrization, Value};

/// 파이브레이션을 이루는 두 사상
pub trait FibrationMap: fmt::Debug {
    /// 이 매니폴드의 정규 배치 입력을 전체 공간의 정의역으로 올린다
    fn embedding(&self, x: &Value) -> Result<Value>;

    /// 전체 공간의 점을 이 매니폴드로 내린다.
    ///
    /// 결과는 정규 배치여야 한다. 외부 배치로의 전치는 `Fibration`이 한다.
    fn fibration(&self, x: &Value) -> Result<Tensor>;
}

/// 전체 공간 체인의 가장 아래에 붙는 임베딩 단계
///
/// 원본 입력은 외부 배치이므로 `transpose`이면 먼저 정규 배치로 돌린다.
#[derive(Debug)]
struct EmbeddingStep<F> {
    maps: Rc<F>,
    transpose: bool,
    link: Link,
}

impl<F: FibrationMap> Parametrization for EmbeddingStep<F> {
    fn forward(&self, x: &Value) -> Result<Value> {
        if self.transpose {
            self.maps.embedding(&transpose_value(x)?)
        } else {
            self.maps.embedding(x)
        }
    }

    fn link(&self) -> &Link {
        &self.link
    }
}

/// 전체 공간 매니폴드 위에 얹힌 파이브레이션
///
/// 자체 앰비언트 상태는 없고 base도 전체 공간의 것을 그대로 쓴다.
#[derive(Debug)]
pub struct Fibration<F> {
    shape: ManifoldShape,
    maps: Rc<F>,
    link: Link,
}

impl<F: FibrationMap + 'static> Fibration<F> {
    /// `total_space` 아래에 임베딩 단계를 붙이고, `total_space`를 이 파이브레이션 아래에 붙인다
    pub fn new(
        dimensions: Dimensions,
        size: &[usize],
        total_space: Rc<dyn Parametrization>,
        maps: F,
    ) -> Result<Self> {
        let shape = ManifoldShape::new(dimensions, size)?;
        if total_space.as_manifold().is_none() {
            return Err(ManifoldError::TypeMismatch {
                expected: "total_space",
                found: total_space.name().to_string(),
            });
        }

        let maps = Rc::new(maps);
        let embedding = EmbeddingStep {
            maps: Rc::clone(&maps),
            transpose: shape.transpose(),
            link: Link::new(),
        };
        total_space.chain(Rc::new(embedding))?;

        let fibration = Self {
            shape,
            maps,
            link: Link::new(),
        };
        fibration.chain(total_space)?;
        Ok(fibration)
    }

    pub fn maps(&self) -> &F {
        &self.maps
    }

    /// 체인으로 연결된 전체 공간 매니폴드
    pub fn total_space(&self) -> Result<&dyn AbstractManifold> {
        self.link
            .below()
            .and_then(|t| t.as_manifold())
            .ok_or_else(|| ManifoldError::invalid_state("fibration has no total space"))
    }
}

impl<F: FibrationMap + 'static> Parametrization for Fibration<F> {
    fn forward(&self, x: &Value) -> Result<Value> {
        let y = self.maps.fibration(x)?;
        Ok(Value::Single(maybe_transpose(y, self.shape.transpose())?))
    }

    fn link(&self) -> &Link {
        &self.link
    }

    fn as_manifold(&self) -> Option<&dyn AbstractManifold> {
        Some(self)
    }
}

impl<F: FibrationMap + 'static> AbstractManifold for Fibration<F> {
    fn shape(&self) -> &ManifoldShape {
        &self.shape
    }

    fn base(&self) -> Option<Tensor> {
        self.total_space().ok().and_then(|t| t.base())
    }

    // 전체 공간과 같은 원본을 공유하므로 0 초기화는 기본 구현에 맡긴다
    fn stage_base(&self, x: Option<&Value>) -> Result<StagedBase> {
        self.total_space()?.stage_base(x)
    }

    fn buffers(&self, prefix: &str) -> Vec<(String, Var)> {
        match self.total_space() {
            Ok(total_space) => total_space.buffers(&buffer_name(prefix, "total_space")),
            Err(_) => Vec::new(),
        }
    }
}

impl<F> fmt::Display for Fibration<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fibration({})", self.shape)
    }
}
