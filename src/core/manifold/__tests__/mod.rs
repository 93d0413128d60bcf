//! # 매니폴드 모듈 테스트
//!
//! 형상 기록, 네 가지 매니폴드 종류, 버퍼 저장의 단위테스트

pub(crate) mod fixtures;

mod fibration_test;
