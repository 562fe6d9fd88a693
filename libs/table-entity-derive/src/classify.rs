use syn::{GenericArgument, PathArguments, Type};

/// Storage class of a declared field type.
pub enum TypeClass {
    /// Natively stored; holds the `EdmType` variant name.
    Native(&'static str),
    /// Stored as JSON text.
    Json,
}

/// Field type after peeling one level of `Option`.
pub struct ClassifiedType {
    pub optional: bool,
    pub class: TypeClass,
}

/// Decide whether `ty` is one of the column types the store holds natively:
/// `Vec<u8>`, `bool`, `DateTime<_>`, `f64`, `Uuid`, `i32`, `i64`, `String`,
/// optionally wrapped in `Option`. Everything else falls back to JSON.
///
/// The check is on the written path (last segment), so type aliases of
/// native types fall back to JSON.
pub fn classify(ty: &Type) -> ClassifiedType {
    let (optional, inner) = match option_inner(ty) {
        Some(inner) => (true, inner),
        None => (false, ty),
    };
    let class = match native_edm_type(inner) {
        Some(edm) => TypeClass::Native(edm),
        None => TypeClass::Json,
    };
    ClassifiedType { optional, class }
}

fn native_edm_type(ty: &Type) -> Option<&'static str> {
    let (ident, args) = last_segment(ty)?;
    let edm = match ident.as_str() {
        "String" => "String",
        "bool" => "Boolean",
        "i32" => "Int32",
        "i64" => "Int64",
        "f64" => "Double",
        "Uuid" => "Guid",
        "DateTime" => "DateTime",
        "Vec" => match single_type_arg(args).and_then(last_segment) {
            Some((elem, _)) if elem == "u8" => "Binary",
            _ => return None,
        },
        _ => return None,
    };
    Some(edm)
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let (ident, args) = last_segment(ty)?;
    if ident != "Option" {
        return None;
    }
    single_type_arg(args)
}

/// Extract the last path segment ident name and its arguments (e.g. `Vec`, `<u8>`).
fn last_segment(ty: &Type) -> Option<(String, &PathArguments)> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|seg| (seg.ident.to_string(), &seg.arguments)),
        Type::Group(group) => last_segment(&group.elem),
        Type::Paren(paren) => last_segment(&paren.elem),
        _ => None,
    }
}

fn single_type_arg(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = args else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first() {
        Some(GenericArgument::Type(ty)) => Some(ty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_of(src: &str) -> (bool, Option<&'static str>) {
        let ty: Type = syn::parse_str(src).unwrap();
        let classified = classify(&ty);
        let edm = match classified.class {
            TypeClass::Native(edm) => Some(edm),
            TypeClass::Json => None,
        };
        (classified.optional, edm)
    }

    #[test]
    fn native_types() {
        assert_eq!(class_of("String"), (false, Some("String")));
        assert_eq!(class_of("bool"), (false, Some("Boolean")));
        assert_eq!(class_of("i32"), (false, Some("Int32")));
        assert_eq!(class_of("i64"), (false, Some("Int64")));
        assert_eq!(class_of("f64"), (false, Some("Double")));
        assert_eq!(class_of("uuid::Uuid"), (false, Some("Guid")));
        assert_eq!(class_of("chrono::DateTime<chrono::Utc>"), (false, Some("DateTime")));
        assert_eq!(class_of("Vec<u8>"), (false, Some("Binary")));
    }

    #[test]
    fn option_is_peeled_once() {
        assert_eq!(class_of("Option<String>"), (true, Some("String")));
        assert_eq!(class_of("std::option::Option<Vec<u8>>"), (true, Some("Binary")));
        assert_eq!(class_of("Option<Option<i32>>"), (true, None));
    }

    #[test]
    fn everything_else_is_json() {
        assert_eq!(class_of("Vec<Chapter>"), (false, None));
        assert_eq!(class_of("Option<Vec<Chapter>>"), (true, None));
        assert_eq!(class_of("u64"), (false, None));
        assert_eq!(class_of("f32"), (false, None));
        assert_eq!(class_of("HashMap<String, i32>"), (false, None));
        assert_eq!(class_of("(i32, i32)"), (false, None));
    }
}
