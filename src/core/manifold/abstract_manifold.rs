//! 모든 매니폴드 종류가 구현하는 공통 인터페이스

use candle_core::{Tensor, Var, D};
use log::debug;

use super::shape::ManifoldShape;
use crate::core::error::{ManifoldError, Result};
use crate::core::parametrize::{Parametrization, Value};

/// 아직 반영되지 않은 base 갱신: 대상 버퍼와 새 값 (정규 배치, 테이프 분리됨)
pub type StagedBase = Vec<(Var, Tensor)>;

/// 매니폴드 공통 기능
///
/// 형상 기록, base 점 조회와 갱신, 저장 가능한 버퍼 목록.
///
/// `update_base`는 같은 base를 읽는 순전파/역전파와 동시에 호출하면 안 된다.
/// 체인이 `Rc` 기반이라 스레드를 넘지 않으므로 한 스레드 안에서의 호출 순서는
/// 호출자의 책임이다.
pub trait AbstractManifold: Parametrization {
    fn shape(&self) -> &ManifoldShape;

    /// 현재 base 점 (정규 배치, 그래디언트 추적 없음). base가 없는 매니폴드는 `None`
    fn base(&self) -> Option<Tensor>;

    /// base 갱신에 쓸 새 값들을 계산만 한다. 아무것도 바꾸지 않는다.
    ///
    /// base가 없는 매니폴드는 `InvalidState`.
    fn stage_base(&self, x: Option<&Value>) -> Result<StagedBase>;

    /// base 점을 현재 값(또는 `x`를 원본으로 본 값)으로 옮긴다.
    ///
    /// 모든 새 값을 먼저 계산하고, 하나라도 실패하면 base도 원본도 바꾸지 않는다.
    /// 등록된 상태라면 원본을 0으로 만들어 다음 순전파가 새 base에서 시작하게 한다.
    fn update_base(&self, x: Option<&Value>) -> Result<()> {
        let registered = self.is_registered();
        if !registered && x.is_none() {
            return Err(ManifoldError::invalid_state(
                "cannot update the base before registering the parametrization",
            ));
        }
        let staged = self.stage_base(x)?;
        for (var, point) in &staged {
            var.set(point)?;
        }
        if registered {
            self.zero_originals()?;
        }
        debug!(
            "updated {} base buffer(s) of {} (registered: {})",
            staged.len(),
            self.name(),
            registered
        );
        Ok(())
    }

    /// 저장 대상 버퍼들 (`prefix.`로 시작하는 이름)
    fn buffers(&self, _prefix: &str) -> Vec<(String, Var)> {
        Vec::new()
    }
}

/// 마지막 두 축 교환
pub(crate) fn transpose_last(t: &Tensor) -> Result<Tensor> {
    Ok(t.transpose(D::Minus2, D::Minus1)?)
}

pub(crate) fn maybe_transpose(t: Tensor, transpose: bool) -> Result<Tensor> {
    if transpose {
        transpose_last(&t)
    } else {
        Ok(t)
    }
}

/// 새 base 값을 버퍼의 형상/자료형/장치에 맞춘다. 형상이 다르면 오류
pub(crate) fn fit_to_buffer(point: Tensor, var: &Var) -> Result<Tensor> {
    if point.dims() != var.dims() {
        return Err(ManifoldError::invalid_argument(format!(
            "new base has shape {:?}, expected {:?}",
            point.dims(),
            var.dims()
        )));
    }
    Ok(point.to_device(var.device())?.to_dtype(var.dtype())?.copy()?)
}

/// 값 안의 모든 텐서에 `transpose_last` 적용
pub(crate) fn transpose_value(x: &Value) -> Result<Value> {
    match x {
        Value::Single(t) => Ok(Value::Single(transpose_last(t)?)),
        Value::Tuple(xs) => Ok(Value::Tuple(
            xs.iter().map(transpose_value).collect::<Result<Vec<_>>>()?,
        )),
    }
}

/// 버퍼 이름 결합: `""` + `base` → `base`, `total_space` + `base` → `total_space.base`
pub(crate) fn buffer_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
