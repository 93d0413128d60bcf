use candle_core::{DType, Device};

/// base 버퍼 할당 설정
#[derive(Debug, Clone)]
pub struct ManifoldOptions {
    /// base 버퍼 자료형
    pub dtype: DType,
    /// base 버퍼 장치
    pub device: Device,
}

impl Default for ManifoldOptions {
    fn default() -> Self {
        Self {
            dtype: DType::F32,
            device: Device::Cpu,
        }
    }
}

impl ManifoldOptions {
    /// 새 설정 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 자료형 설정
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// 장치 설정
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}
