//! Template helpers emitting KumaScript macro calls

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value;

/// Register the macro helpers on `registry`
pub fn register(registry: &mut Handlebars<'_>) {
    registry.register_helper("macro", Box::new(macro_helper));
    registry.register_helper("xref", Box::new(xref_helper));
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Macro call text: `{{Name}}` or `{{Name("a", "b")}}`
pub fn macro_call(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        return format!("{{{{{name}}}}}");
    }
    let quoted: Vec<String> = args.iter().map(|a| format!("\"{a}\"")).collect();
    format!("{{{{{name}({})}}}}", quoted.join(", "))
}

/// `{{macro "APIRef" groupName}}`; null arguments are dropped
fn macro_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let name = h
        .param(0)
        .and_then(|p| text(p.value()))
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("macro", 0))?;
    let args: Vec<String> = h.params().iter().skip(1).filter_map(|p| text(p.value())).collect();
    out.write(&macro_call(&name, &args))?;
    Ok(())
}

/// `{{xref interfaceName name suffix="()"}}` joins its parameters with `.`
fn xref_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let mut target = h
        .params()
        .iter()
        .filter_map(|p| text(p.value()))
        .collect::<Vec<_>>()
        .join(".");
    if target.is_empty() {
        return Err(RenderErrorReason::ParamNotFoundForIndex("xref", 0).into());
    }
    if let Some(suffix) = h.hash_get("suffix").and_then(|s| text(s.value())) {
        target.push_str(&suffix);
    }
    out.write(&macro_call("domxref", &[target]))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> Handlebars<'static> {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        register(&mut hb);
        hb
    }

    #[test]
    fn test_macro_call() {
        assert_eq!(macro_call("SeeCompatTable", &[]), "{{SeeCompatTable}}");
        assert_eq!(
            macro_call("domxref", &["Node".into(), "nodes".into()]),
            "{{domxref(\"Node\", \"nodes\")}}"
        );
    }

    #[test]
    fn test_macro_helper_drops_null() {
        let hb = registry();
        let text = hb
            .render_template("{{macro \"APIRef\" group}}", &json!({ "group": null }))
            .unwrap();
        assert_eq!(text, "{{APIRef}}");
        let text = hb
            .render_template("{{macro \"APIRef\" group}}", &json!({ "group": "DOM" }))
            .unwrap();
        assert_eq!(text, "{{APIRef(\"DOM\")}}");
    }

    #[test]
    fn test_xref_helper() {
        let hb = registry();
        let text = hb
            .render_template(
                "{{xref iface name suffix=\"()\"}}",
                &json!({ "iface": "Node", "name": "appendChild" }),
            )
            .unwrap();
        assert_eq!(text, "{{domxref(\"Node.appendChild()\")}}");
        assert!(hb.render_template("{{xref missing}}", &json!({})).is_err());
    }
}
