//! 체인을 실제 텐서에 등록

use std::rc::Rc;

use candle_core::{Tensor, Var};
use log::debug;

use super::chain::Parametrization;
use super::value::Value;
use crate::core::error::{ManifoldError, Result};
use crate::core::manifold::AbstractManifold;

/// 등록된 체인의 원본(제약 없는) 텐서들
///
/// 체인의 모든 단계가 같은 원본을 공유한다.
#[derive(Debug, Clone)]
pub struct Originals(Rc<OriginalsInner>);

#[derive(Debug)]
struct OriginalsInner {
    vars: Vec<Var>,
    value: Value,
}

impl Originals {
    fn new(original: &Value) -> Result<Self> {
        let (vars, value) = match original {
            Value::Single(t) => {
                let var = Var::from_tensor(t)?;
                let value = Value::Single(var.as_tensor().clone());
                (vec![var], value)
            }
            Value::Tuple(xs) => {
                let mut vars = Vec::with_capacity(xs.len());
                for x in xs {
                    let t = x.single().map_err(|_| {
                        ManifoldError::invalid_argument(
                            "nested tuples cannot be registered as originals",
                        )
                    })?;
                    vars.push(Var::from_tensor(t)?);
                }
                let value = Value::Tuple(
                    vars.iter()
                        .map(|v| Value::Single(v.as_tensor().clone()))
                        .collect(),
                );
                (vars, value)
            }
        };
        Ok(Self(Rc::new(OriginalsInner { vars, value })))
    }

    /// 그래디언트가 추적되는 원본 값
    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub fn vars(&self) -> &[Var] {
        &self.0.vars
    }

    /// 원본 텐서를 제자리에서 0으로 초기화 (재할당 없음)
    pub fn zero(&self) -> Result<()> {
        for var in &self.0.vars {
            var.set(&var.zeros_like()?)?;
        }
        Ok(())
    }
}

/// 파라미터화가 등록된 텐서
///
/// 최적화기는 `vars()`의 원본을 갱신하고, 모델은 `value()`로 제약된 값을 읽는다.
#[derive(Debug, Clone)]
pub struct ParametrizedTensor {
    parametrization: Rc<dyn Parametrization>,
    originals: Originals,
}

impl ParametrizedTensor {
    pub fn parametrization(&self) -> &Rc<dyn Parametrization> {
        &self.parametrization
    }

    pub fn originals(&self) -> &Originals {
        &self.originals
    }

    /// 최적화기에 넘길 원본 변수들
    pub fn vars(&self) -> Vec<Var> {
        self.originals.vars().to_vec()
    }

    /// 현재 파라미터화된 값
    pub fn value(&self) -> Result<Value> {
        self.parametrization.evaluate(None)
    }

    pub fn tensor(&self) -> Result<Tensor> {
        self.value()?.into_single()
    }

    pub fn manifold(&self) -> Option<&dyn AbstractManifold> {
        self.parametrization.as_manifold()
    }

    /// 최상위 매니폴드의 base를 현재 값으로 옮긴다
    pub fn update_base(&self) -> Result<()> {
        let manifold = self.manifold().ok_or_else(|| ManifoldError::TypeMismatch {
            expected: "the registered parametrization",
            found: self.parametrization.name().to_string(),
        })?;
        manifold.update_base(None)
    }
}

/// `parametrization` 체인을 `original` 텐서(들)에 등록한다.
///
/// 원본은 `Var`로 복사되고 체인의 모든 단계가 등록 상태로 바뀐다.
/// 등록 전에 한 번 평가해서 형상이 맞는지 확인한다.
pub fn register(
    parametrization: Rc<dyn Parametrization>,
    original: impl Into<Value>,
) -> Result<ParametrizedTensor> {
    if parametrization.is_registered() {
        return Err(ManifoldError::invalid_state(
            "parametrization is already registered",
        ));
    }
    let originals = Originals::new(&original.into())?;
    parametrization.evaluate(Some(originals.value()))?;
    parametrization.link().mark_registered(&originals)?;
    debug!(
        "registered {} on {} original tensor(s)",
        parametrization.name(),
        originals.vars().len()
    );
    Ok(ParametrizedTensor {
        parametrization,
        originals,
    })
}
