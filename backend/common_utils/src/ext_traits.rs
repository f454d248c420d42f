use error_stack::ResultExt;

use crate::errors::{CustomResult, ParsingError};

pub trait ByteSliceExt {
    /// Convert `[u8]` into type `<T>` by using `serde::Deserialize`
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, ParsingError>
    where
        T: serde::Deserialize<'de>;
}

impl ByteSliceExt for [u8] {
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, ParsingError>
    where
        T: serde::Deserialize<'de>,
    {
        serde_json::from_slice(self)
            .change_context(ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| {
                format!(
                    "Unable to parse {type_name} from bytes {:?}",
                    String::from_utf8_lossy(self)
                )
            })
    }
}

pub trait OptionExt<T> {
    /// Drop a value that carries no information, such as an empty string
    fn filter_empty(self) -> Option<T>;
}

impl OptionExt<String> for Option<String> {
    fn filter_empty(self) -> Self {
        self.filter(|value| !value.is_empty())
    }
}
