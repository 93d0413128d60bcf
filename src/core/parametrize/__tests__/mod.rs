//! # 파라미터화 체인 테스트
