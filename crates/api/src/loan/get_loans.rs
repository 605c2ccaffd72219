use crate::error::ReeniError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use reeni_api_structs::get_loans::*;
use reeni_domain::LoanItem;
use reeni_infra::ReeniContext;

pub async fn get_loans_controller(
    ctx: web::Data<ReeniContext>,
) -> Result<HttpResponse, ReeniError> {
    let usecase = GetLoansUseCase;

    execute(usecase, &ctx)
        .await
        .map(|loans| HttpResponse::Ok().json(APIResponse::new(loans)))
        .map_err(ReeniError::from)
}

#[derive(Debug)]
pub struct GetLoansUseCase;

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

impl From<UseCaseErrors> for ReeniError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetLoansUseCase {
    type Response = Vec<LoanItem>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetLoans";

    async fn execute(&mut self, ctx: &ReeniContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .loans
            .find_all()
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
