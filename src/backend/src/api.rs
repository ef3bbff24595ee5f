use crate::{
    config::SiteConfig,
    generation_client::QrGenerator,
    http_client::{UpstreamError, handle_service_result},
    kv_store_client::RecordStore,
    render::{self, PageOptions},
    services::{
        generation::{GenerationOutcome, GenerationService},
        results::ResultsService,
    },
};
use actix_web::{HttpResponse, Responder, http::header, web};
use log::{debug, error};
use nopasswords_core::{
    GENERATE_ACTION, GenerateRequest, GenerateResponse, GenerationResult, Model,
    commands::navigation::results_path, failure_message,
};
use serde_json::json;

const HTML: &str = "text/html; charset=utf-8";

#[derive(Clone)]
pub struct Api<Store, Generator>
where
    Store: RecordStore,
    Generator: QrGenerator,
{
    pub store: Store,
    pub generator: Generator,
    pub site: SiteConfig,
    /// Pages load the browser shell from `/static`
    pub with_shell: bool,
}

impl<Store, Generator> Api<Store, Generator>
where
    Store: RecordStore,
    Generator: QrGenerator,
{
    pub fn new(store: Store, generator: Generator, site: SiteConfig, with_shell: bool) -> Self {
        Api {
            store,
            generator,
            site,
            with_shell,
        }
    }

    fn page_options(&self) -> PageOptions<'_> {
        PageOptions {
            site: &self.site,
            with_shell: self.with_shell,
        }
    }

    fn html(&self, mut response: actix_web::HttpResponseBuilder, model: &Model) -> HttpResponse {
        let page = render::form_page(
            &model.view(),
            None,
            &GenerationResult::NoResult,
            &self.page_options(),
        );
        response.content_type(HTML).body(page)
    }

    pub async fn index(api: web::Data<Self>) -> impl Responder {
        debug!("index() called");
        api.html(HttpResponse::Ok(), &Model::default())
    }

    pub async fn results(id: web::Path<String>, api: web::Data<Self>) -> impl Responder {
        debug!("results() called: {id}");

        match ResultsService::load(&api.store, &api.site, &id).await {
            Ok(Some(page)) => {
                let view = Model::from_result(page.result.clone()).view();
                HttpResponse::Ok().content_type(HTML).body(render::form_page(
                    &view,
                    Some(&page.metadata),
                    &page.result,
                    &api.page_options(),
                ))
            }
            Ok(None) => HttpResponse::NotFound()
                .content_type(HTML)
                .body(render::not_found_page(&api.site)),
            Err(e) => {
                error!("results failed: {e:#}");
                HttpResponse::InternalServerError().body("failed to load result")
            }
        }
    }

    pub async fn generate(
        body: web::Json<GenerateRequest>,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("generate() called");

        match GenerationService::generate(&api.generator, body.into_inner()).await {
            Ok(GenerationOutcome::Invalid(field_errors)) => {
                HttpResponse::BadRequest().json(json!({ "errors": field_errors }))
            }
            Ok(GenerationOutcome::Generated(response)) => {
                handle_service_result(Ok(response), "generate")
            }
            Err(e) => handle_service_result::<GenerateResponse>(Err(e), "generate"),
        }
    }

    /// Form post fallback for clients without the browser shell
    pub async fn submit_form(
        form: web::Form<GenerateRequest>,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("submit_form() called");

        let request = form.into_inner();
        let mut model = Model {
            form: request.clone(),
            ..Default::default()
        };

        match GenerationService::generate(&api.generator, request).await {
            Ok(GenerationOutcome::Generated(response)) => HttpResponse::SeeOther()
                .append_header((header::LOCATION, results_path(&response.id)))
                .finish(),
            Ok(GenerationOutcome::Invalid(field_errors)) => {
                model.field_errors = field_errors;
                api.html(HttpResponse::BadRequest(), &model)
            }
            Err(e) => {
                error!("submit_form failed: {e:#}");
                let message = match UpstreamError::find(&e) {
                    Some(upstream) => {
                        failure_message(GENERATE_ACTION, upstream.status.as_u16(), &upstream.body)
                    }
                    None => format!("Failed to {GENERATE_ACTION}: service unavailable"),
                };
                model.set_error(message);
                api.html(HttpResponse::BadGateway(), &model)
            }
        }
    }

    pub async fn not_found(api: web::Data<Self>) -> impl Responder {
        HttpResponse::NotFound()
            .content_type(HTML)
            .body(render::not_found_page(&api.site))
    }

    pub async fn healthcheck() -> impl Responder {
        debug!("healthcheck() called");
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    }

    pub async fn version() -> impl Responder {
        HttpResponse::Ok().body(env!("CARGO_PKG_VERSION"))
    }
}
