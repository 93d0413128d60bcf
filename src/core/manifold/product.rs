//! 독립 매니폴드들의 곱 M1 × M2 × ... × Mn
//!
//! 입력 튜플의 i번째 원소는 i번째 매니폴드의 체인 전체로 평가된다.

use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use candle_core::{Tensor, Var};

use super::abstract_manifold::{buffer_name, AbstractManifold, StagedBase};
use super::shape::ManifoldShape;
use crate::core::error::{ManifoldError, Result};
use crate::core::parametrize::{Link, Parametrization, Value};

/// 곱 매니폴드. 생성 후에는 구성 매니폴드 목록을 바꿀 수 없다
#[derive(Debug)]
pub struct ProductManifold {
    shape: ManifoldShape,
    manifolds: Vec<Rc<dyn Parametrization>>,
    link: Link,
}

impl ProductManifold {
    /// 모든 원소가 매니폴드여야 한다. `dim`은 각 원소의 `dim` 튜플
    pub fn new(manifolds: Vec<Rc<dyn Parametrization>>) -> Result<Self> {
        let dims = manifolds
            .iter()
            .map(|m| {
                m.as_manifold()
                    .map(|mani| mani.shape().dim().clone())
                    .ok_or_else(|| ManifoldError::TypeMismatch {
                        expected: "all elements in a ProductManifold",
                        found: m.name().to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            shape: ManifoldShape::product(dims),
            manifolds,
            link: Link::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.manifolds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifolds.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Rc<dyn Parametrization>> {
        self.manifolds.get(idx)
    }

    /// `idx`번째 구성 매니폴드
    pub fn manifold(&self, idx: usize) -> Option<&dyn AbstractManifold> {
        self.manifolds.get(idx).and_then(|m| m.as_manifold())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rc<dyn Parametrization>> {
        self.manifolds.iter()
    }

    /// 구성 매니폴드들의 타입 이름 (생성 순서)
    pub fn names(&self) -> Vec<&'static str> {
        self.manifolds.iter().map(|m| m.name()).collect()
    }

    /// 입력 개수가 구성 매니폴드 개수와 같은지 확인. 잘라내지 않는다
    fn zip_inputs<'a>(&self, xs: &'a Value) -> Result<&'a [Value]> {
        let xs = xs.tuple();
        if xs.len() != self.manifolds.len() {
            return Err(ManifoldError::invalid_argument(format!(
                "ProductManifold of {} manifolds got {} inputs",
                self.manifolds.len(),
                xs.len()
            )));
        }
        Ok(xs)
    }

    fn component<'a>(&self, m: &'a Rc<dyn Parametrization>) -> Result<&'a dyn AbstractManifold> {
        m.as_manifold().ok_or_else(|| ManifoldError::TypeMismatch {
            expected: "all elements in a ProductManifold",
            found: m.name().to_string(),
        })
    }
}

impl Parametrization for ProductManifold {
    fn forward(&self, x: &Value) -> Result<Value> {
        let xs = self.zip_inputs(x)?;
        let ys = self
            .manifolds
            .iter()
            .zip(xs)
            .map(|(m, x)| m.evaluate(Some(x)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Tuple(ys))
    }

    fn link(&self) -> &Link {
        &self.link
    }

    fn as_manifold(&self) -> Option<&dyn AbstractManifold> {
        Some(self)
    }
}

impl AbstractManifold for ProductManifold {
    fn shape(&self) -> &ManifoldShape {
        &self.shape
    }

    fn base(&self) -> Option<Tensor> {
        None
    }

    /// 각 구성 매니폴드의 새 base를 해당 입력으로 계산한다.
    ///
    /// `xs`가 없으면 이 곱 매니폴드에 들어오는 현재 입력을 쓴다.
    /// 구성 매니폴드 중 하나라도 base가 없거나 평가에 실패하면 전체가 실패한다.
    fn stage_base(&self, xs: Option<&Value>) -> Result<StagedBase> {
        let xs = match xs {
            Some(xs) => xs.detach(),
            None => self.originals()?.detach(),
        };
        let xs = self.zip_inputs(&xs)?;
        let mut staged = Vec::new();
        for (m, x) in self.manifolds.iter().zip(xs) {
            staged.extend(self.component(m)?.stage_base(Some(x))?);
        }
        Ok(staged)
    }

    fn buffers(&self, prefix: &str) -> Vec<(String, Var)> {
        self.manifolds
            .iter()
            .enumerate()
            .filter_map(|(i, m)| {
                m.as_manifold()
                    .map(|mani| mani.buffers(&buffer_name(prefix, &format!("manifolds.{}", i))))
            })
            .flatten()
            .collect()
    }
}

impl Index<usize> for ProductManifold {
    type Output = dyn Parametrization;

    fn index(&self, idx: usize) -> &Self::Output {
        &*self.manifolds[idx]
    }
}

impl<'a> IntoIterator for &'a ProductManifold {
    type Item = &'a Rc<dyn Parametrization>;
    type IntoIter = std::slice::Iter<'a, Rc<dyn Parametrization>>;

    fn into_iter(self) -> Self::IntoIter {
        self.manifolds.iter()
    }
}

impl fmt::Display for ProductManifold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ProductManifold({}) (", self.shape)?;
        for (i, m) in self.manifolds.iter().enumerate() {
            writeln!(f, "  ({}): {}", i, m.name())?;
        }
        write!(f, ")")
    }
}
