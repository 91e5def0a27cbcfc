//! `models/_abstract.py`: the base class of every model object.

use eyre::Result;
use vrap_codegen::{FileProducer, builder::CodeBuilder};
use vrap_core::TemplateFile;

use super::GENERATED_HEADER;
use crate::layout::PackageLayout;

const BASE_TYPE: &str = r#"class _BaseType:
    _fields: typing.Dict[str, str] = {}

    @classmethod
    def deserialize(cls, data: typing.Dict[str, typing.Any]):
        return cls(**{attr: data[key] for attr, key in cls._fields.items() if key in data})

    def serialize(self) -> typing.Dict[str, typing.Any]:
        return {
            key: getattr(self, attr)
            for attr, key in self._fields.items()
            if getattr(self, attr) is not None
        }

    def __eq__(self, other):
        if other.__class__ is self.__class__:
            return self.__values__() == other.__values__()
        else:
            return NotImplemented

    def __ne__(self, other):
        result = self.__eq__(other)
        if result is NotImplemented:
            return NotImplemented
        else:
            return not result

    def __lt__(self, other):
        if other.__class__ is self.__class__:
            return self.__values__() < other.__values__()
        else:
            return NotImplemented

    def __le__(self, other):
        if other.__class__ is self.__class__:
            return self.__values__() <= other.__values__()
        else:
            return NotImplemented

    def __gt__(self, other):
        if other.__class__ is self.__class__:
            return self.__values__() > other.__values__()
        else:
            return NotImplemented

    def __ge__(self, other):
        if other.__class__ is self.__class__:
            return self.__values__() >= other.__values__()
        else:
            return NotImplemented

    def __values__(self):
        return tuple(self.__dict__.values())

    def __hash__(self):
        return hash((self.__class__,) + self.__values__())

    def __repr__(self):
        return "%s(%s)" % (
            self.__class__.__name__,
            ", ".join("%s=%r" % (k, v) for k, v in self.__dict__.items()),
        )"#;

/// The `_BaseType` module.
pub struct AbstractBaseProducer {
    layout: PackageLayout,
}

impl AbstractBaseProducer {
    pub fn new(layout: PackageLayout) -> Self {
        Self { layout }
    }
}

impl FileProducer for AbstractBaseProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        let mut builder = CodeBuilder::python();
        builder
            .push_lines(GENERATED_HEADER)
            .push_blank()
            .push_line("import typing")
            .push_blank()
            .push_blank()
            .push_lines(BASE_TYPE);

        Ok(vec![TemplateFile::new(
            self.layout.module_path(&self.layout.abstract_module()),
            builder.build(),
        )])
    }
}
