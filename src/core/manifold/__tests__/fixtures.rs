//! 테스트용 구체 매니폴드와 체인 단계

use std::cell::RefCell;

use candle_core::{Device, Tensor, D};

use crate::core::error::Result;
use crate::core::manifold::{FibrationMap, Projection, Trivialization};
use crate::core::parametrize::{Link, Parametrization, Value};

/// 마지막 축 방향 정규화: x / ||x||
#[derive(Debug)]
pub struct Sphere;

impl Projection for Sphere {
    fn projection(&self, x: &Tensor) -> Result<Tensor> {
        let norm = x.sqr()?.sum_keepdim(D::Minus1)?.sqrt()?;
        Ok(x.broadcast_div(&norm)?)
    }
}

/// 유클리드 공간의 자명화: x + B
#[derive(Debug)]
pub struct Translation;

impl Trivialization for Translation {
    fn trivialization(&self, x: &Tensor, base: &Tensor) -> Result<Tensor> {
        Ok(x.add(base)?)
    }
}

/// 들어온 정규 배치 형상을 기록하는 항등 사상
#[derive(Debug, Default)]
pub struct ShapeProbe {
    pub seen: RefCell<Vec<Vec<usize>>>,
}

impl Projection for ShapeProbe {
    fn projection(&self, x: &Tensor) -> Result<Tensor> {
        self.seen.borrow_mut().push(x.dims().to_vec());
        Ok(x.clone())
    }
}

impl Trivialization for ShapeProbe {
    fn trivialization(&self, x: &Tensor, base: &Tensor) -> Result<Tensor> {
        self.seen.borrow_mut().push(x.dims().to_vec());
        Ok(x.add(base)?)
    }
}

/// 정규 배치 (n, k) 행렬을 0 열로 채워 (n, n)으로 올리고, 앞의 k 열로 내린다
#[derive(Debug)]
pub struct ColumnPad {
    pub n: usize,
    pub k: usize,
}

impl FibrationMap for ColumnPad {
    fn embedding(&self, x: &Value) -> Result<Value> {
        let x = x.single()?;
        Ok(Value::Single(x.pad_with_zeros(D::Minus1, 0, self.n - self.k)?))
    }

    fn fibration(&self, x: &Value) -> Result<Tensor> {
        Ok(x.single()?.narrow(D::Minus1, 0, self.k)?)
    }
}

/// 매니폴드가 아닌 체인 단계: 2x
#[derive(Debug, Default)]
pub struct Doubling {
    link: Link,
}

impl Parametrization for Doubling {
    fn forward(&self, x: &Value) -> Result<Value> {
        Ok(Value::Single(x.single()?.affine(2.0, 0.0)?))
    }

    fn link(&self) -> &Link {
        &self.link
    }
}

/// 매니폴드가 아닌 체인 단계: x + 1
#[derive(Debug, Default)]
pub struct AddOne {
    link: Link,
}

impl Parametrization for AddOne {
    fn forward(&self, x: &Value) -> Result<Value> {
        Ok(Value::Single(x.single()?.affine(1.0, 1.0)?))
    }

    fn link(&self) -> &Link {
        &self.link
    }
}

pub fn tensor(data: &[f32], shape: &[usize]) -> Tensor {
    Tensor::from_slice(data, shape, &Device::Cpu).unwrap()
}

/// 0.1, 0.2, ... 로 채운 텐서
pub fn ramp(shape: &[usize]) -> Tensor {
    let len: usize = shape.iter().product();
    let data: Vec<f32> = (1..=len).map(|i| i as f32 * 0.1).collect();
    tensor(&data, shape)
}

pub fn to_vec(t: &Tensor) -> Vec<f32> {
    t.flatten_all().unwrap().to_vec1::<f32>().unwrap()
}

pub fn assert_close(a: &[f32], b: &[f32]) {
    assert_eq!(a.len(), b.len(), "길이 불일치");
    for (x, y) in a.iter().zip(b.iter()) {
        approx::assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
