//! OpenAPI document: component schemas from the model, a path item for every route.

use crate::auth::{Claims, IssuedToken};
use crate::handlers::auth::LoginRequest;
use crate::model::{
    Brand, BrandInput, City, CityInput, Dependent, DependentInput, Person, PersonInput, Product,
    ProductInput,
};
use utoipa::openapi::path::{
    HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, PathItem,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{ArrayBuilder, ObjectBuilder, Schema, Type};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{
    ContentBuilder, PathsBuilder, Ref, RefOr, Required, Response, ResponseBuilder,
};
use utoipa::{Modify, OpenApi};

pub const BEARER_SCHEME: &str = "Bearer";

#[derive(OpenApi)]
#[openapi(
    info(title = "Produtos e Pessoas API", version = "v1"),
    components(schemas(
        Product, ProductInput, Brand, BrandInput, Person, PersonInput,
        Dependent, DependentInput, City, CityInput, LoginRequest, IssuedToken, Claims
    )),
    modifiers(&BearerSecurity),
    security(("Bearer" = []))
)]
struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Insira o Token"))
                    .build(),
            ),
        );
    }
}

/// Query parameter type of a list filter.
#[derive(Clone, Copy)]
enum ParamKind {
    Integer,
    Text,
}

/// A CRUD resource as documented: base path, tag, schema names and list filters.
struct ResourceDoc {
    path: &'static str,
    tag: &'static str,
    schema: &'static str,
    input: &'static str,
    filters: &'static [(&'static str, ParamKind, &'static str)],
}

const RESOURCES: &[ResourceDoc] = &[
    ResourceDoc {
        path: "/api/products",
        tag: "products",
        schema: "Product",
        input: "ProductInput",
        filters: &[
            ("brandId", ParamKind::Integer, "Only products of this brand"),
            (
                "brandDescription",
                ParamKind::Text,
                "Only products whose brand description contains this text",
            ),
        ],
    },
    ResourceDoc {
        path: "/api/brands",
        tag: "brands",
        schema: "Brand",
        input: "BrandInput",
        filters: &[("description", ParamKind::Text, "Description contains this text")],
    },
    ResourceDoc {
        path: "/api/people",
        tag: "people",
        schema: "Person",
        input: "PersonInput",
        filters: &[("cityId", ParamKind::Integer, "Only people living in this city")],
    },
    ResourceDoc {
        path: "/api/dependents",
        tag: "dependents",
        schema: "Dependent",
        input: "DependentInput",
        filters: &[("personId", ParamKind::Integer, "Only dependents of this person")],
    },
    ResourceDoc {
        path: "/api/cities",
        tag: "cities",
        schema: "City",
        input: "CityInput",
        filters: &[("state", ParamKind::Text, "Two-letter state (UF)")],
    },
];

fn scalar(kind: ParamKind) -> RefOr<Schema> {
    let ty = match kind {
        ParamKind::Integer => Type::Integer,
        ParamKind::Text => Type::String,
    };
    RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(ty).build()))
}

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

/// `{"data": <data>}`
fn envelope(data: RefOr<Schema>) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .property("data", data)
            .required("data")
            .build(),
    ))
}

/// `{"data": [<item>], "meta": {"count": n}}`
fn list_envelope(item: &str) -> RefOr<Schema> {
    let meta = ObjectBuilder::new()
        .property("count", scalar(ParamKind::Integer))
        .required("count")
        .build();
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .property(
                "data",
                RefOr::T(Schema::Array(ArrayBuilder::new().items(schema_ref(item)).build())),
            )
            .property("meta", RefOr::T(Schema::Object(meta)))
            .required("data")
            .required("meta")
            .build(),
    ))
}

fn json_response(description: &str, schema: RefOr<Schema>) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content(
            "application/json",
            ContentBuilder::new().schema(Some(schema)).build(),
        )
        .build()
}

fn error_response(description: &str) -> Response {
    ResponseBuilder::new().description(description).build()
}

fn id_param() -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(scalar(ParamKind::Integer)))
        .build()
}

fn json_body(schema: &str) -> utoipa::openapi::request_body::RequestBody {
    RequestBodyBuilder::new()
        .content(
            "application/json",
            ContentBuilder::new().schema(Some(schema_ref(schema))).build(),
        )
        .required(Some(Required::True))
        .build()
}

fn resource_paths(r: &ResourceDoc) -> Vec<(String, PathItem)> {
    let item_path = format!("{}/{{id}}", r.path);

    let mut list = OperationBuilder::new()
        .tag(r.tag)
        .operation_id(Some(format!("list_{}", r.tag)))
        .summary(Some(format!("List {}", r.tag)))
        .response("200", json_response("Rows ordered by id", list_envelope(r.schema)))
        .response("401", error_response("Missing or invalid bearer token"));
    for (name, kind, description) in r.filters {
        list = list.parameter(
            ParameterBuilder::new()
                .name(*name)
                .parameter_in(ParameterIn::Query)
                .required(Required::False)
                .description(Some(*description))
                .schema(Some(scalar(*kind)))
                .build(),
        );
    }

    let create = OperationBuilder::new()
        .tag(r.tag)
        .operation_id(Some(format!("create_{}", r.tag)))
        .summary(Some(format!("Add a {}", r.schema)))
        .request_body(Some(json_body(r.input)))
        .response("201", json_response("Stored row", envelope(schema_ref(r.schema))))
        .response("409", error_response("Referenced row missing or duplicate value"))
        .response("422", error_response("Validation failed"));

    let read = OperationBuilder::new()
        .tag(r.tag)
        .operation_id(Some(format!("get_{}", r.tag)))
        .summary(Some(format!("Find a {} by id", r.schema)))
        .parameter(id_param())
        .response("200", json_response("The row", envelope(schema_ref(r.schema))))
        .response("404", error_response("No row with this id"));

    let update = OperationBuilder::new()
        .tag(r.tag)
        .operation_id(Some(format!("update_{}", r.tag)))
        .summary(Some(format!("Update a {}", r.schema)))
        .parameter(id_param())
        .request_body(Some(json_body(r.input)))
        .response("200", json_response("Updated row", envelope(schema_ref(r.schema))))
        .response("404", error_response("No row with this id"))
        .response("422", error_response("Validation failed"));

    let delete = OperationBuilder::new()
        .tag(r.tag)
        .operation_id(Some(format!("delete_{}", r.tag)))
        .summary(Some(format!("Delete a {}", r.schema)))
        .parameter(id_param())
        .response(
            "200",
            json_response(
                "Always true",
                envelope(RefOr::T(Schema::Object(
                    ObjectBuilder::new().schema_type(Type::Boolean).build(),
                ))),
            ),
        )
        .response("404", error_response("No row with this id"))
        .response("409", error_response("Row is still referenced"));

    vec![
        (r.path.to_string(), PathItem::new(HttpMethod::Get, list)),
        (r.path.to_string(), PathItem::new(HttpMethod::Post, create)),
        (item_path.clone(), PathItem::new(HttpMethod::Get, read)),
        (item_path.clone(), PathItem::new(HttpMethod::Put, update)),
        (item_path, PathItem::new(HttpMethod::Delete, delete)),
    ]
}

fn auth_paths() -> Vec<(String, PathItem)> {
    let login = OperationBuilder::new()
        .tag("auth")
        .operation_id(Some("login"))
        .summary(Some("Exchange credentials for a bearer token"))
        .security(SecurityRequirement::default())
        .request_body(Some(json_body("LoginRequest")))
        .response("200", json_response("Issued token", envelope(schema_ref("IssuedToken"))))
        .response("401", error_response("Invalid username or password"));

    let me = OperationBuilder::new()
        .tag("auth")
        .operation_id(Some("me"))
        .summary(Some("Claims of the current token"))
        .response("200", json_response("Token claims", envelope(schema_ref("Claims"))))
        .response("401", error_response("Missing or invalid bearer token"));

    vec![
        ("/api/auth/login".to_string(), PathItem::new(HttpMethod::Post, login)),
        ("/api/auth/me".to_string(), PathItem::new(HttpMethod::Get, me)),
    ]
}

/// Build the full document served at `/swagger/v1/swagger.json`.
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let mut paths = PathsBuilder::new();
    for (path, item) in RESOURCES.iter().flat_map(resource_paths).chain(auth_paths()) {
        paths = paths.path(path, item);
    }
    doc.paths = paths.build();
    doc
}
