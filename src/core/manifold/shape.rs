//! 매니폴드 형상/차원 기록
//!
//! 모든 매니폴드가 공유하는 부분: 앰비언트 텐서 형상 중 어느 축을
//! 매니폴드가 다루고 어느 축이 배치(tensorial) 축인지, 그리고 2차원
//! 매니폴드의 정규(tall, `n >= k`) 배치를 위한 전치 여부.

use std::fmt;
use std::str::FromStr;

use crate::core::error::{ManifoldError, Result};

/// 매니폴드가 다루는 뒤쪽 축의 개수, 또는 곱 매니폴드 표시
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensions {
    /// 앰비언트 형상의 마지막 `d`개 축
    Trailing(usize),
    /// 하위 매니폴드들의 튜플 입력 전체
    Product,
}

impl Dimensions {
    pub fn is_product(&self) -> bool {
        matches!(self, Dimensions::Product)
    }
}

impl From<usize> for Dimensions {
    fn from(d: usize) -> Self {
        Dimensions::Trailing(d)
    }
}

impl TryFrom<i64> for Dimensions {
    type Error = ManifoldError;

    fn try_from(d: i64) -> Result<Self> {
        usize::try_from(d).map(Dimensions::Trailing).map_err(|_| {
            ManifoldError::invalid_argument(format!(
                "dimensions should be a non-negative integer or 'product'. Got {}",
                d
            ))
        })
    }
}

impl FromStr for Dimensions {
    type Err = ManifoldError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "product" {
            return Ok(Dimensions::Product);
        }
        match s.parse::<i64>() {
            Ok(d) => Dimensions::try_from(d),
            Err(_) => Err(ManifoldError::invalid_argument(format!(
                "dimensions should be a non-negative integer or 'product'. Got {}",
                s
            ))),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimensions::Trailing(d) => write!(f, "{}", d),
            Dimensions::Product => write!(f, "product"),
        }
    }
}

/// 정규 배치 기준의 뒤쪽 형상
///
/// 곱 매니폴드는 각 하위 매니폴드의 `Dim` 튜플을 가진다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dim {
    Axes(Vec<usize>),
    Product(Vec<Dim>),
}

impl Dim {
    pub fn axes(&self) -> Option<&[usize]> {
        match self {
            Dim::Axes(axes) => Some(axes),
            Dim::Product(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dim::Axes(axes) => axes.len(),
            Dim::Product(dims) => dims.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 마지막 두 축을 뒤바꾼 형상. 축이 둘 미만이거나 곱 형상이면 그대로
    fn swapped(&self) -> Dim {
        match self {
            Dim::Axes(axes) if axes.len() >= 2 => {
                let mut axes = axes.clone();
                let len = axes.len();
                axes.swap(len - 2, len - 1);
                Dim::Axes(axes)
            }
            other => other.clone(),
        }
    }
}

impl From<Vec<usize>> for Dim {
    fn from(axes: Vec<usize>) -> Self {
        Dim::Axes(axes)
    }
}

/// 파이썬 튜플 표기: `(4,)`, `(3, 2)`, `()`
fn fmt_tuple<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    if items.len() == 1 {
        write!(f, ",")?;
    }
    write!(f, ")")
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Axes(axes) => fmt_tuple(f, axes),
            Dim::Product(dims) => fmt_tuple(f, dims),
        }
    }
}

/// 매니폴드의 형상 기록 (모든 매니폴드 종류가 공유)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifoldShape {
    dimensions: Dimensions,
    tensorial_size: Vec<usize>,
    transpose: bool,
    dim: Dim,
}

impl ManifoldShape {
    /// 앰비언트 형상 `size`의 마지막 `dimensions`개 축을 다루는 매니폴드
    ///
    /// - 1차원: `dim = (n,)`
    /// - 2차원: `n < k`이면 두 축을 바꾸고 `transpose = true`. 정규형은 항상 `n >= k`
    /// - 3차원 이상: 뒤쪽 축을 순서대로
    pub fn new(dimensions: Dimensions, size: &[usize]) -> Result<Self> {
        let d = match dimensions {
            Dimensions::Trailing(d) => d,
            Dimensions::Product => {
                return Err(ManifoldError::invalid_argument(
                    "product shapes are built from the component dims, use ManifoldShape::product",
                ))
            }
        };
        if size.len() < d {
            return Err(ManifoldError::invalid_argument(format!(
                "size {:?} has fewer than {} dimensions",
                size, d
            )));
        }
        let split = size.len() - d;
        let tensorial_size = size[..split].to_vec();
        let mut axes = size[split..].to_vec();
        let mut transpose = false;
        if d == 2 && axes[0] < axes[1] {
            axes.swap(0, 1);
            transpose = true;
        }
        Ok(Self {
            dimensions,
            tensorial_size,
            transpose,
            dim: Dim::Axes(axes),
        })
    }

    /// 곱 매니폴드: 배치 축 없음, 전치 없음, `dim`은 하위 형상들의 튜플
    pub fn product(dims: Vec<Dim>) -> Self {
        Self {
            dimensions: Dimensions::Product,
            tensorial_size: Vec::new(),
            transpose: false,
            dim: Dim::Product(dims),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn tensorial_size(&self) -> &[usize] {
        &self.tensorial_size
    }

    pub fn transpose(&self) -> bool {
        self.transpose
    }

    /// 정규(전치 후) 형상
    pub fn dim(&self) -> &Dim {
        &self.dim
    }

    /// 외부에 보이는(전치 전) 형상
    pub fn orig_dim(&self) -> Dim {
        if self.transpose {
            self.dim.swapped()
        } else {
            self.dim.clone()
        }
    }

    pub fn n(&self) -> Option<usize> {
        match self.dimensions {
            Dimensions::Trailing(1) | Dimensions::Trailing(2) => {
                self.dim.axes().and_then(|a| a.first().copied())
            }
            _ => None,
        }
    }

    pub fn k(&self) -> Option<usize> {
        match self.dimensions {
            Dimensions::Trailing(2) => self.dim.axes().and_then(|a| a.get(1).copied()),
            _ => None,
        }
    }

    /// 정규 배치의 전체 텐서 형상 (`tensorial_size ++ dim`). base 버퍼의 형상
    pub fn canonical_size(&self) -> Result<Vec<usize>> {
        self.full_size(&self.dim)
    }

    /// 외부에 보이는 전체 텐서 형상
    pub fn presented_size(&self) -> Result<Vec<usize>> {
        self.full_size(&self.orig_dim())
    }

    fn full_size(&self, dim: &Dim) -> Result<Vec<usize>> {
        let axes = dim.axes().ok_or_else(|| {
            ManifoldError::invalid_state("a product manifold has no single tensor shape")
        })?;
        Ok(self
            .tensorial_size
            .iter()
            .chain(axes.iter())
            .copied()
            .collect())
    }
}

impl fmt::Display for ManifoldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.n(), self.k()) {
            (Some(n), Some(k)) => write!(f, "n={}, k={}", n, k)?,
            (Some(n), None) => write!(f, "n={}", n)?,
            _ => write!(f, "dim={}", self.dim)?,
        }
        if !self.tensorial_size.is_empty() {
            write!(f, ", tensorial_size=")?;
            fmt_tuple(f, &self.tensorial_size)?;
        }
        Ok(())
    }
}
