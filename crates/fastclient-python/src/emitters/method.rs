use std::collections::BTreeSet;

use minijinja::context;

use fastclient_core::config::ClientKind;

use crate::emitters::models::{ModelCatalog, ModelCategory};
use crate::error::GenerateError;
use crate::ir::{BUILTIN_SENTINELS, PyType, docstring_block};
use crate::operation::{OperationInfo, ResponseObject};
use crate::printer::{METHOD_TEMPLATE, Printer};

const DUMP_ARGS: &str = r#"mode="json", exclude_unset=True, by_alias=True"#;
const QUERY_DUMP_ARGS: &str = r#"mode="json", exclude_none=True, by_alias=True"#;

/// Which of the four request layouts a method uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodShape {
    Plain,
    Path,
    Query,
    PathAndQuery,
}

impl MethodShape {
    pub fn has_path(self) -> bool {
        matches!(self, MethodShape::Path | MethodShape::PathAndQuery)
    }
}

/// How the decoded JSON payload is handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnResponse {
    /// Statement run before `return`, e.g. binding the decoded payload.
    pub setup: Option<String>,
    pub expr: String,
}

/// How a value of some annotation crosses the JSON boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    /// `BaseModel`: built from a mapping, sent through `model_dump`.
    Model,
    /// `(str, Enum)`: built from the value, sent as-is.
    Enum,
    /// Anything else that mentions a generated class goes through a
    /// pydantic `TypeAdapter`.
    Adapter,
    Raw,
}

/// Builds the Python source of one manager method for a transport.
#[derive(Debug, Clone, Copy)]
pub struct MethodBuilder<'a> {
    kind: ClientKind,
    catalog: &'a ModelCatalog,
}

impl<'a> MethodBuilder<'a> {
    pub fn new(kind: ClientKind, catalog: &'a ModelCatalog) -> Self {
        Self { kind, catalog }
    }

    fn conversion(&self, ty: &PyType) -> Conversion {
        match ty {
            PyType::Model(name) if BUILTIN_SENTINELS.contains(&name.as_str()) => Conversion::Raw,
            PyType::Model(name) => match self.catalog.category(name) {
                ModelCategory::Object => Conversion::Model,
                ModelCategory::Enum => Conversion::Enum,
                ModelCategory::Alias => Conversion::Adapter,
            },
            PyType::List(inner) if matches!(inner.as_ref(), PyType::Model(_)) => {
                self.conversion(inner)
            }
            other => {
                let mut models = BTreeSet::new();
                other.collect_models(&mut models);
                if models.is_empty() {
                    Conversion::Raw
                } else {
                    Conversion::Adapter
                }
            }
        }
    }

    /// `true` when the method body refers to pydantic's `TypeAdapter`.
    pub fn uses_type_adapter(&self, info: &OperationInfo) -> bool {
        let request = info.request.as_ref().map(|r| self.conversion(r));
        let response = info.response.annotation().map(|a| self.conversion(&a));
        request == Some(Conversion::Adapter) || response == Some(Conversion::Adapter)
    }

    /// Signature arguments after `self`: request body, path parameters,
    /// query container, then `**kwargs`.
    pub fn build_method_args(&self, info: &OperationInfo) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(request) = &info.request {
            args.push(format!("req_data: {request}"));
        }
        args.extend(info.path_parameters.iter().map(|p| p.declaration()));
        if let Some(model) = &info.query_model {
            if info.query_is_optional() {
                args.push(format!("params: Optional[{model}] = None"));
            } else {
                args.push(format!("params: {model}"));
            }
        }
        args.push("**kwargs".to_string());
        args
    }

    /// Keyword arguments of the session call after the URL.
    pub fn build_request_call_args(&self, info: &OperationInfo) -> Vec<String> {
        let mut args = Vec::new();
        if info.query_model.is_some() {
            let dump = format!("params.model_dump({QUERY_DUMP_ARGS})");
            if info.query_is_optional() {
                args.push(format!("params={dump} if params is not None else None"));
            } else {
                args.push(format!("params={dump}"));
            }
        }
        if let Some(request) = &info.request {
            args.push(match (self.conversion(request), request) {
                (Conversion::Model, PyType::List(_)) => {
                    format!("json=[item.model_dump({DUMP_ARGS}) for item in req_data]")
                }
                (Conversion::Model, _) => format!("json=req_data.model_dump({DUMP_ARGS})"),
                (Conversion::Adapter, _) => {
                    format!("json=TypeAdapter({request}).dump_python(req_data, {DUMP_ARGS})")
                }
                (Conversion::Enum | Conversion::Raw, _) => "json=req_data".to_string(),
            });
        }
        args.push("**kwargs".to_string());
        args
    }

    /// Return annotation. Every method may return `None` on a non-success
    /// status.
    pub fn build_response_type(&self, info: &OperationInfo) -> String {
        match &info.response {
            ResponseObject::Empty => "None".to_string(),
            ResponseObject::Unknown => "Optional[Any]".to_string(),
            typed => match typed.annotation() {
                Some(annotation) => annotation.optional().to_string(),
                None => "Optional[Any]".to_string(),
            },
        }
    }

    /// Expression turning the decoded payload into the return value.
    pub fn build_return_response(&self, info: &OperationInfo) -> ReturnResponse {
        let (payload, setup) = match self.kind {
            ClientKind::Sync => ("response_obj.json()", None),
            ClientKind::Async => ("data", Some("data = await resp.json()".to_string())),
        };
        let raw = ReturnResponse {
            setup: None,
            expr: match self.kind {
                ClientKind::Sync => "response_obj.json()",
                ClientKind::Async => "await resp.json()",
            }
            .to_string(),
        };
        let (item, is_list, annotation) = match (&info.response, info.response.annotation()) {
            (ResponseObject::Empty, _) => {
                return ReturnResponse {
                    setup: None,
                    expr: "None".to_string(),
                };
            }
            (ResponseObject::Typed { item, is_list }, Some(annotation)) => {
                (item, *is_list, annotation)
            }
            _ => return raw,
        };
        let expr = match (self.conversion(&annotation), is_list) {
            (Conversion::Model, true) => format!("[{item}(**obj) for obj in {payload}]"),
            (Conversion::Model, false) => format!("{item}(**{payload})"),
            (Conversion::Enum, true) => format!("[{item}(obj) for obj in {payload}]"),
            (Conversion::Enum, false) => format!("{item}({payload})"),
            (Conversion::Adapter, _) => {
                format!("TypeAdapter({annotation}).validate_python({payload})")
            }
            (Conversion::Raw, _) => return raw,
        };
        ReturnResponse { setup, expr }
    }

    pub fn shape(&self, info: &OperationInfo) -> MethodShape {
        match (!info.path_parameters.is_empty(), info.query_model.is_some()) {
            (false, false) => MethodShape::Plain,
            (true, false) => MethodShape::Path,
            (false, true) => MethodShape::Query,
            (true, true) => MethodShape::PathAndQuery,
        }
    }

    pub fn build(&self, printer: &Printer, info: &OperationInfo) -> Result<String, GenerateError> {
        let shape = self.shape(info);
        let url = format!("{{self.base_url}}{}", info.url);
        let url_arg = if shape.has_path() {
            "url".to_string()
        } else {
            format!("f\"{url}\"")
        };
        let ReturnResponse { setup, expr } = self.build_return_response(info);
        let rendered = printer.render(
            METHOD_TEMPLATE,
            context! {
                is_async => self.kind == ClientKind::Async,
                name => info.function_name.clone(),
                args => self.build_method_args(info).join(", "),
                return_type => self.build_response_type(info),
                docstring => info.docstring().map(|d| docstring_block(&d, 8)),
                bind_url => shape.has_path(),
                url => url,
                url_arg => url_arg,
                http_method => info.method.as_str(),
                call_args => self.build_request_call_args(info).join(", "),
                setup => setup,
                return_expr => expr,
            },
        )?;
        Ok(rendered.trim_end().to_string())
    }
}
