/// Values a welcome or leave template is rendered against.
pub struct TemplateContext<'a> {
    pub mention: &'a str,
    pub user_name: &'a str,
    pub server: &'a str,
    pub member_count: u64,
}

/// Substitutes the `{user}`, `{user_name}`, `{server}` and `{member_count}`
/// placeholders. Unknown braces are left untouched.
pub fn render_template(template: &str, ctx: &TemplateContext) -> String {
    template
        .replace("{user}", ctx.mention)
        .replace("{user_name}", ctx.user_name)
        .replace("{server}", ctx.server)
        .replace("{member_count}", &ctx.member_count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TemplateContext<'static> {
        TemplateContext {
            mention: "<@42>",
            user_name: "alice",
            server: "Floh HQ",
            member_count: 128,
        }
    }

    #[test]
    fn substitutes_every_placeholder() {
        let rendered = render_template(
            "{user} ({user_name}) joined {server} as member #{member_count}",
            &context(),
        );
        assert_eq!(rendered, "<@42> (alice) joined Floh HQ as member #128");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        let rendered = render_template("Welcome aboard! {unknown}", &context());
        assert_eq!(rendered, "Welcome aboard! {unknown}");
    }
}
