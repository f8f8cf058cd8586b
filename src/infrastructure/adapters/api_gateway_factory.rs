//! API 게이트웨이 포트 구현 어댑터.

use anyhow::{Context, Result};

use crate::application::ports::{ApiGateway, ApiGatewayFactory};
use crate::infrastructure::api::HttpApiGateway;

pub struct HttpApiGatewayFactory;

impl ApiGatewayFactory for HttpApiGatewayFactory {
    fn build(&self, base_url: &str) -> Result<Box<dyn ApiGateway>> {
        let gateway = HttpApiGateway::new(base_url)
            .with_context(|| format!("invalid api_url `{base_url}`"))?;
        Ok(Box::new(gateway))
    }
}
