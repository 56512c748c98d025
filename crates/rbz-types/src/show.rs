//! Diagnostic rendering of types.
//!
//! `show` renders types the way the user writes them in signatures, so
//! diagnostics can quote them directly.

use crate::store::TypeStore;
use crate::types::{LiteralValue, Type};
use rbz_common::TypeId;
use rbz_symbols::{SymbolTable, well_known_names};

pub fn show(store: &TypeStore, symbols: &SymbolTable, t: TypeId) -> String {
    match store.ty(t) {
        Type::Untyped { .. } => "T.untyped".to_string(),
        Type::Bottom => "T.noreturn".to_string(),
        Type::Top => "T.anything".to_string(),
        Type::Void => "void".to_string(),
        Type::Class(c) => symbols.show_class(c),
        Type::Applied { class, targs } => {
            let args: Vec<String> = targs.iter().map(|&a| show(store, symbols, a)).collect();
            format!("{}[{}]", symbols.show_class(class), args.join(", "))
        }
        Type::Literal { underlying, value } => match value {
            LiteralValue::Symbol(name) => format!("Symbol(:{})", symbols.name(name)),
            LiteralValue::String(name) => format!("String(\"{}\")", symbols.name(name)),
            LiteralValue::Integer(v) => format!("Integer({v})"),
            LiteralValue::Float(bits) => format!("Float({})", f64::from_bits(bits)),
            LiteralValue::Boolean(_) => symbols.show_class(underlying),
        },
        Type::Shape { keys, values } => {
            let entries: Vec<String> = keys
                .iter()
                .zip(values.iter())
                .map(|(&k, &v)| {
                    let value = show(store, symbols, v);
                    match store.ty(k) {
                        Type::Literal {
                            value: LiteralValue::Symbol(name),
                            ..
                        } => format!("{}: {}", symbols.name(name), value),
                        _ => format!("{} => {}", show(store, symbols, k), value),
                    }
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Type::Tuple { elems } => {
            let parts: Vec<String> = elems.iter().map(|&e| show(store, symbols, e)).collect();
            format!("[{}]", parts.join(", "))
        }
        Type::Or { .. } => {
            let mut components = Vec::new();
            collect_or(store, t, &mut components);
            // T.nilable reads better than a union with NilClass.
            if components.len() == 2 && components.contains(&TypeId::NIL) {
                let other = components
                    .into_iter()
                    .find(|&c| c != TypeId::NIL)
                    .unwrap_or(TypeId::NIL);
                return format!("T.nilable({})", show(store, symbols, other));
            }
            if t == store.boolean() {
                return "T::Boolean".to_string();
            }
            let parts: Vec<String> = components
                .iter()
                .map(|&c| show(store, symbols, c))
                .collect();
            format!("T.any({})", parts.join(", "))
        }
        Type::And { left, right } => {
            format!(
                "T.all({}, {})",
                show(store, symbols, left),
                show(store, symbols, right)
            )
        }
        Type::Meta { wrapped } => format!("<Type: {}>", show(store, symbols, wrapped)),
        Type::TypeVar { var } => format!("T.type_parameter(:T{})", var.0),
        Type::SelfTypeParam { name, .. } => {
            if name == well_known_names::ATTACHED_CLASS {
                "T.attached_class".to_string()
            } else {
                format!("T.self_type({})", symbols.name(name))
            }
        }
        Type::LambdaParam { class, index, .. } => {
            let def = symbols.class(class);
            let member = def.type_members.get(index as usize);
            match member {
                Some(m) => format!(
                    "{}::{}",
                    symbols.name(def.name),
                    symbols.name(m.name)
                ),
                None => format!("{}::<type member {}>", symbols.name(def.name), index),
            }
        }
    }
}

fn collect_or(store: &TypeStore, t: TypeId, out: &mut Vec<TypeId>) {
    match store.ty(t) {
        Type::Or { left, right } => {
            collect_or(store, left, out);
            collect_or(store, right, out);
        }
        _ => out.push(t),
    }
}
