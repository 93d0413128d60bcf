use std::rc::Rc;

use candle_core::D;

use super::fixtures::{
    assert_close, init_logger, ramp, to_vec, ColumnPad, Doubling, Sphere, Translation,
};
use crate::core::error::ManifoldError;
use crate::core::manifold::{
    AbstractManifold, Dim, Dimensions, EmbeddedManifold, Fibration, Manifold,
};
use crate::core::parametrize::{register, Parametrization, Value};

/// 외부 형상 (2, 4) → 정규 (4, 2), 전체 공간은 (4, 4)
fn wide_fibration() -> Fibration<ColumnPad> {
    let total_space = Rc::new(Manifold::new(Dimensions::Trailing(2), &[4, 4], Translation).unwrap());
    Fibration::new(
        Dimensions::Trailing(2),
        &[2, 4],
        total_space,
        ColumnPad { n: 4, k: 2 },
    )
    .unwrap()
}

#[test]
fn 매니폴드가_아닌_전체공간_거부_테스트() {
    let not_a_manifold = Rc::new(Doubling::default());

    let err = Fibration::new(
        Dimensions::Trailing(2),
        &[4, 2],
        not_a_manifold,
        ColumnPad { n: 4, k: 2 },
    )
    .unwrap_err();

    match err {
        ManifoldError::TypeMismatch { expected, found } => {
            assert_eq!(expected, "total_space");
            assert!(found.contains("Doubling"), "타입 이름 포함: {}", found);
        }
        other => panic!("TypeMismatch가 아님: {:?}", other),
    }
}

#[test]
fn 전체공간_읽기_테스트() {
    let fibration = wide_fibration();

    let total_space = fibration.total_space().unwrap();
    assert_eq!(total_space.shape().dim(), &Dim::Axes(vec![4, 4]));
    assert!(fibration.shape().transpose());
    assert_eq!(fibration.base().unwrap().dims(), &[4, 4], "base는 전체 공간의 것");
    assert_eq!(fibration.to_string(), "Fibration(n=4, k=2)");
}

#[test]
fn 넓은_파이브레이션_순전파_테스트() {
    let fibration = wide_fibration();
    let x = ramp(&[2, 4]);

    let y = fibration.evaluate(Some(&Value::from(&x))).unwrap().into_single().unwrap();

    // base = 0: 임베딩(전치 + 0 열 채움) → +0 → 앞 두 열 → 전치
    assert_eq!(y.dims(), &[2, 4]);
    assert_close(&to_vec(&y), &to_vec(&x));

    println!("✅ 파이브레이션 순전파: {:?} → {:?}", x.dims(), y.dims());
}

#[test]
fn 전치없는_파이브레이션_순전파_테스트() {
    let total_space = Rc::new(Manifold::new(Dimensions::Trailing(2), &[4, 4], Translation).unwrap());
    let fibration = Fibration::new(
        Dimensions::Trailing(2),
        &[4, 2],
        total_space,
        ColumnPad { n: 4, k: 2 },
    )
    .unwrap();
    let x = ramp(&[4, 2]);

    let y = fibration.evaluate(Some(&Value::from(&x))).unwrap().into_single().unwrap();

    assert!(!fibration.shape().transpose());
    assert_eq!(y.dims(), &[4, 2]);
    assert_close(&to_vec(&y), &to_vec(&x));
}

#[test]
fn 등록전_base갱신은_전체공간으로_위임_테스트() {
    init_logger();
    let fibration = wide_fibration();
    let x = ramp(&[2, 4]);

    let err = fibration.update_base(None).unwrap_err();
    assert!(matches!(err, ManifoldError::InvalidState(_)));

    fibration.update_base(Some(&Value::from(&x))).unwrap();

    let base = fibration.base().unwrap();
    let expected = x.t().unwrap().pad_with_zeros(D::Minus1, 0, 2).unwrap();
    assert_close(&to_vec(&base), &to_vec(&expected));
    assert_close(
        &to_vec(&fibration.total_space().unwrap().base().unwrap()),
        &to_vec(&base),
    );
}

#[test]
fn 등록후_base갱신_테스트() {
    init_logger();
    let fibration: Rc<dyn Parametrization> = Rc::new(wide_fibration());
    let param = register(Rc::clone(&fibration), ramp(&[2, 4])).unwrap();
    let before = to_vec(&param.tensor().unwrap());

    assert!(fibration.is_registered());
    param.update_base().unwrap();

    assert!(to_vec(param.vars()[0].as_tensor()).iter().all(|v| *v == 0.0));
    assert_close(&to_vec(&param.tensor().unwrap()), &before);

    let buffers = fibration.as_manifold().unwrap().buffers("");
    let names: Vec<_> = buffers.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["total_space.base"]);

    println!("✅ 등록 후 파이브레이션 base 갱신 테스트 통과");
}

#[test]
fn 사영_전체공간의_base갱신_거부_테스트() {
    let total_space =
        Rc::new(EmbeddedManifold::new(Dimensions::Trailing(1), &[4, 4], Sphere).unwrap());
    let fibration: Rc<dyn Parametrization> = Rc::new(
        Fibration::new(Dimensions::Trailing(2), &[4, 2], total_space, ColumnPad { n: 4, k: 2 })
            .unwrap(),
    );
    let mani = fibration.as_manifold().unwrap();
    let x = ramp(&[4, 2]);

    let err = mani.update_base(Some(&Value::from(&x))).unwrap_err();
    assert!(matches!(err, ManifoldError::InvalidState(_)));
    assert!(mani.base().is_none());

    let param = register(Rc::clone(&fibration), x.clone()).unwrap();
    let before = to_vec(&param.tensor().unwrap());
    assert!(param.update_base().is_err());
    assert_close(&to_vec(param.vars()[0].as_tensor()), &to_vec(&x));
    assert_close(&to_vec(&param.tensor().unwrap()), &before);
}
