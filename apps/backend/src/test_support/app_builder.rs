//! Actix test service wired like the production server.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::web;
use actix_web::{App, Error as ActixError};

use crate::error::AppError;
use crate::middleware::{cors_middleware, AccessLog, RequestTrace};
use crate::routes;
use crate::state::app_state::AppState;

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder {
        state,
        cors_origins: Vec::new(),
    }
}

pub struct TestAppBuilder {
    state: AppState,
    cors_origins: Vec<String>,
}

impl TestAppBuilder {
    /// Routes are always the production table; kept so call sites read the
    /// same as the server setup.
    pub fn with_prod_routes(self) -> Self {
        self
    }

    /// Origins accepted by the CORS layer. None by default, which still lets
    /// requests without an `Origin` header through.
    pub fn with_cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Same middleware order as `main`: trace id outermost, then the access
    /// log, then CORS.
    pub async fn build(
        self,
    ) -> Result<
        impl Service<
            actix_http::Request,
            Response = ServiceResponse<EitherBody<BoxBody>>,
            Error = ActixError,
        >,
        AppError,
    > {
        let app = App::new()
            .wrap(cors_middleware(&self.cors_origins))
            .wrap(AccessLog)
            .wrap(RequestTrace)
            .app_data(web::Data::new(self.state))
            .configure(routes::configure);

        Ok(actix_web::test::init_service(app).await)
    }
}
