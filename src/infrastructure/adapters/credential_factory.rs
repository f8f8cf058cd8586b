//! 토큰 공급자 포트 구현 어댑터.

use crate::application::ports::{CredentialFactory, CredentialProvider};
use crate::application::resolver::KeyResolver;
use crate::infrastructure::credentials::{ChainCredentialProvider, CredentialSettings};

/// 선택된 platform 설정으로 인증 체인을 구성한다.
pub struct ChainCredentialFactory;

impl CredentialFactory for ChainCredentialFactory {
    fn build(&self, resolver: &KeyResolver) -> Box<dyn CredentialProvider> {
        Box::new(ChainCredentialProvider::new(
            CredentialSettings::from_resolver(resolver),
        ))
    }
}
