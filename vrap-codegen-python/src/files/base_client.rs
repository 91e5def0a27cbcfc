//! `base_client.py`: the HTTP layer request builders call into.

use eyre::Result;
use vrap_codegen::{FileProducer, builder::CodeBuilder};
use vrap_core::TemplateFile;

use super::GENERATED_HEADER;
use crate::layout::PackageLayout;

const BASE_CLIENT: &str = r#"import functools
import typing

import requests


class ApiError(Exception):
    def __init__(self, obj: typing.Any, response: requests.Response):
        super().__init__("Request failed with status code %s" % response.status_code)
        self.obj = obj
        self.response = response


class BaseClient:
    def __init__(
        self,
        url: str,
        session: typing.Optional[requests.Session] = None,
        headers: typing.Optional[typing.Dict[str, str]] = None,
    ):
        self._url = url.rstrip("/")
        self._session = session or requests.Session()
        self._headers = headers or {}

    def _request(
        self,
        method: str,
        endpoint: str,
        params: typing.Dict[str, typing.Any],
        headers: typing.Dict[str, str],
        options: typing.Optional[typing.Dict[str, typing.Any]] = None,
        json: typing.Any = None,
        data: typing.Any = None,
    ) -> requests.Response:
        return self._session.request(
            method,
            self._url + endpoint,
            params={k: v for k, v in params.items() if v is not None},
            headers={**self._headers, **headers},
            json=json,
            data=data,
            **(options or {}),
        )

    _get = functools.partialmethod(_request, "GET")
    _head = functools.partialmethod(_request, "HEAD")
    _post = functools.partialmethod(_request, "POST")
    _put = functools.partialmethod(_request, "PUT")
    _patch = functools.partialmethod(_request, "PATCH")
    _delete = functools.partialmethod(_request, "DELETE")
    _options = functools.partialmethod(_request, "OPTIONS")

    def _create_exception(self, obj: typing.Any, response: requests.Response) -> ApiError:
        return ApiError(obj, response)"#;

/// The base client module every generated client extends.
pub struct BaseClientProducer {
    layout: PackageLayout,
}

impl BaseClientProducer {
    pub fn new(layout: PackageLayout) -> Self {
        Self { layout }
    }
}

impl FileProducer for BaseClientProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        let mut builder = CodeBuilder::python();
        builder
            .push_lines(GENERATED_HEADER)
            .push_blank()
            .push_lines(BASE_CLIENT);

        Ok(vec![TemplateFile::new(
            self.layout.module_path(&self.layout.base_client_module()),
            builder.build(),
        )])
    }
}
