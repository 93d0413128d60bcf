//! 파라미터화 체인
//!
//! 각 단계는 자신보다 먼저 적용되는 단계(`below`)를 하나 가진다.
//! 원본 텐서 → 가장 깊은 단계 → ... → 최상위 단계 순서로 평가된다.

use std::fmt;
use std::rc::Rc;

use log::debug;
use once_cell::unsync::OnceCell;

use super::registration::Originals;
use super::value::Value;
use crate::core::error::{ManifoldError, Result};
use crate::core::manifold::AbstractManifold;

/// 미분 가능한 재파라미터화 단계
pub trait Parametrization: fmt::Debug {
    /// 한 단계의 순전파
    fn forward(&self, x: &Value) -> Result<Value>;

    /// 체인/등록 상태
    fn link(&self) -> &Link;

    /// 매니폴드 기능 조회. 매니폴드가 아닌 단계는 `None`
    fn as_manifold(&self) -> Option<&dyn AbstractManifold> {
        None
    }

    /// 진단용 구체 타입 이름
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn is_registered(&self) -> bool {
        self.link().is_registered()
    }

    /// 체인의 가장 깊은 끝에 `next`를 덧붙인다.
    ///
    /// `next`의 출력이 현재 체인의 마지막 단계의 입력이 된다.
    fn chain(&self, next: Rc<dyn Parametrization>) -> Result<()> {
        if self.is_registered() || next.is_registered() {
            return Err(ManifoldError::invalid_state(
                "cannot chain a parametrization after registration",
            ));
        }
        let mut last = self.link();
        while let Some(below) = last.below.get() {
            last = below.link();
        }
        debug!("chaining {} under {}", next.name(), self.name());
        last.below
            .set(next)
            .map_err(|_| ManifoldError::invalid_state("chain link is already occupied"))
    }

    /// 체인 전체를 평가한다.
    ///
    /// `x`가 주어지면 등록된 원본 대신 `x`를 체인의 원본 입력으로 본다.
    /// 저장된 파라미터는 변경하지 않는다.
    fn evaluate(&self, x: Option<&Value>) -> Result<Value> {
        let input = match x {
            Some(x) => self.link().feed(x)?,
            None => self.originals()?,
        };
        self.forward(&input)
    }

    /// 등록된 원본 텐서가 아래 단계들을 거쳐 이 단계에 들어오는 값
    fn originals(&self) -> Result<Value> {
        let raw = self.link().registration()?.value().clone();
        self.link().feed(&raw)
    }

    /// 체인의 원본(제약 없는) 텐서를 제자리에서 0으로 만든다
    fn zero_originals(&self) -> Result<()> {
        self.link().registration()?.zero()
    }
}

/// 체인 연결과 등록 상태
///
/// 두 칸 모두 한 번만 채워진다: 아래 단계는 `chain`에서, 원본은 등록 시에.
#[derive(Debug, Default)]
pub struct Link {
    below: OnceCell<Rc<dyn Parametrization>>,
    originals: OnceCell<Originals>,
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    /// 바로 아래(먼저 적용되는) 단계
    pub fn below(&self) -> Option<&Rc<dyn Parametrization>> {
        self.below.get()
    }

    pub fn is_registered(&self) -> bool {
        self.originals.get().is_some()
    }

    pub fn registration(&self) -> Result<&Originals> {
        self.originals.get().ok_or_else(|| {
            ManifoldError::invalid_state("parametrization is not registered on a tensor")
        })
    }

    /// 아래 단계들을 `x`에 적용한다. 아래 단계가 없으면 그대로 통과
    pub fn feed(&self, x: &Value) -> Result<Value> {
        match self.below.get() {
            Some(below) => below.evaluate(Some(x)),
            None => Ok(x.clone()),
        }
    }

    pub(crate) fn mark_registered(&self, originals: &Originals) -> Result<()> {
        self.originals
            .set(originals.clone())
            .map_err(|_| ManifoldError::invalid_state("parametrization is already registered"))?;
        if let Some(below) = self.below.get() {
            below.link().mark_registered(originals)?;
        }
        Ok(())
    }
}
