use reeni_infra::ReeniContext;
use std::fmt::Debug;
use tracing::error;

#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response;
    type Errors;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &ReeniContext) -> Result<Self::Response, Self::Errors>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &ReeniContext) -> Result<U::Response, U::Errors>
where
    U: UseCase,
    U::Errors: Debug,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case: {} failed with error: {:?}", U::NAME, e);
    }

    res
}
