//! base 버퍼 저장/복원 (safetensors)
//!
//! 이름은 매니폴드 트리 경로를 따른다: `base`, `total_space.base`,
//! `manifolds.0.base`, `manifolds.1.total_space.base` ...

use std::collections::HashMap;
use std::path::Path;

use candle_core::{Device, Tensor};
use log::debug;

use super::abstract_manifold::AbstractManifold;
use crate::core::error::{ManifoldError, Result};

/// 매니폴드 트리의 모든 base 버퍼를 이름과 함께 모은다
pub fn buffers_of(manifold: &dyn AbstractManifold) -> HashMap<String, Tensor> {
    manifold
        .buffers("")
        .into_iter()
        .map(|(name, var)| (name, var.as_tensor().detach()))
        .collect()
}

pub fn save_buffers<P: AsRef<Path>>(manifold: &dyn AbstractManifold, path: P) -> Result<()> {
    let tensors = buffers_of(manifold);
    candle_core::safetensors::save(&tensors, path.as_ref())?;
    debug!("saved {} buffers to {}", tensors.len(), path.as_ref().display());
    Ok(())
}

/// 저장된 버퍼를 제자리에 복사한다.
///
/// 이름이 없거나 형상이 다르면 아무것도 바꾸기 전에 실패한다.
pub fn load_buffers<P: AsRef<Path>>(manifold: &dyn AbstractManifold, path: P) -> Result<()> {
    let mut stored = candle_core::safetensors::load(path.as_ref(), &Device::Cpu)?;
    let buffers = manifold.buffers("");

    let mut updates = Vec::with_capacity(buffers.len());
    for (name, var) in &buffers {
        let tensor = stored.remove(name).ok_or_else(|| {
            ManifoldError::invalid_argument(format!("missing buffer '{}' in checkpoint", name))
        })?;
        if tensor.dims() != var.dims() {
            return Err(ManifoldError::invalid_argument(format!(
                "buffer '{}' has shape {:?}, expected {:?}",
                name,
                tensor.dims(),
                var.dims()
            )));
        }
        let tensor = tensor.to_device(var.device())?.to_dtype(var.dtype())?;
        updates.push((var, tensor));
    }
    for (var, tensor) in updates {
        var.set(&tensor)?;
    }
    debug!("loaded {} buffers from {}", buffers.len(), path.as_ref().display());
    Ok(())
}
