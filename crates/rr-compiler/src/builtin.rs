//! Built-in rule set
//!
//! The default rules, in registration order. Order matters where one
//! pattern is a special case of another (the two jump-page rules); the
//! registry rejects the list if that order is broken.

use rr_core::registry::Registry;
use rr_core::transform::Transform;

use crate::builder::{build_registry, BuildError};
use crate::parser::RuleDescriptor;

fn descriptor(name: &str, patterns: &[&str], types: &[&str], transform: Transform) -> RuleDescriptor {
    RuleDescriptor {
        name: name.to_string(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        types: types.iter().map(|t| t.to_string()).collect(),
        transform,
    }
}

fn s(value: &str) -> String {
    value.to_string()
}

const MAIN_FRAME: &[&str] = &["main_frame"];

/// Jump pages that wrap a target URL, longest prefix first.
const JUMP_PREFIXES: &[(&str, &str)] = &[
    ("pixiv-jump-url", "https://www.pixiv.net/jump.php?url="),
    ("pixiv-jump", "https://www.pixiv.net/jump.php?"),
];

/// The default rule descriptors.
pub fn builtin_rules() -> Vec<RuleDescriptor> {
    let mut rules = vec![
        // A channel URL with no sub-page selected opens the uploads tab.
        descriptor(
            "youtube-channel-videos",
            &[
                "https://www.youtube.com/channel/*",
                "https://www.youtube.com/c/*",
                "https://www.youtube.com/user/*",
            ],
            &["main_frame", "xmlhttprequest"],
            Transform::AppendPathAtDepth {
                slash_tokens: 5,
                segment: s("videos"),
                param: s("view"),
                value: s("0"),
            },
        ),
        descriptor(
            "wikipedia-mobile",
            &["https://*.wikipedia.org/*/*"],
            MAIN_FRAME,
            Transform::ReplaceHostInfix {
                from: s(".wikipedia.org"),
                to: s(".m.wikipedia.org"),
                unless: s(".m.wikipedia.org"),
            },
        ),
        descriptor(
            "imdb-desktop",
            &["https://m.imdb.com/*"],
            MAIN_FRAME,
            Transform::ReplacePrefix { from: s("https://m."), to: s("https://") },
        ),
        descriptor(
            "twitter-original-image",
            &["https://pbs.twimg.com/media/*"],
            MAIN_FRAME,
            Transform::SetQueryParam { name: s("name"), value: s("orig") },
        ),
        descriptor(
            "soundcloud-original-artwork",
            &["https://*.sndcdn.com/artworks-*"],
            MAIN_FRAME,
            Transform::ReplaceInfix { from: s("-t500x500"), to: s("-original") },
        ),
        descriptor(
            "mdn-english",
            &["https://developer.mozilla.org/de/*"],
            MAIN_FRAME,
            Transform::ReplacePrefix {
                from: s("https://developer.mozilla.org/de"),
                to: s("https://developer.mozilla.org/en-US"),
            },
        ),
    ];

    for (name, prefix) in JUMP_PREFIXES {
        let pattern = format!("{prefix}*");
        rules.push(descriptor(
            name,
            &[pattern.as_str()],
            MAIN_FRAME,
            Transform::UnwrapPrefix { prefix: s(prefix) },
        ));
    }

    rules.push(descriptor(
        "artstation-custom-domain",
        &["https://*.artstation.com/"],
        MAIN_FRAME,
        Transform::HostPrefixFallback {
            required_prefix: s("https://www."),
            template: s("https://artstation.com/{token}"),
        },
    ));
    rules.push(descriptor(
        "artstation-custom-project",
        &["https://*.artstation.com/projects/*"],
        MAIN_FRAME,
        Transform::TailSegmentTemplate { template: s("https://artstation.com/artwork/{id}") },
    ));

    rules
}

/// Build the registry for the default rules.
pub fn builtin_registry() -> Result<Registry, BuildError> {
    build_registry(&builtin_rules())
}

#[cfg(test)]
mod tests {
    use rr_core::types::{Decision, Request, RequestType};
    use rr_core::Dispatcher;

    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(builtin_registry().expect("built-in rules should build"))
    }

    fn redirect(url: &str) -> Decision {
        Decision::Redirect(url.to_string())
    }

    fn eval(d: &Dispatcher, url: &str) -> Decision {
        d.evaluate_url(url, RequestType::MAIN_FRAME)
    }

    #[test]
    fn youtube_channel_opens_videos() {
        let d = dispatcher();
        assert_eq!(
            eval(&d, "https://www.youtube.com/channel/UC123"),
            redirect("https://www.youtube.com/channel/UC123/videos?view=0")
        );
        assert_eq!(
            d.evaluate_url("https://www.youtube.com/user/someone", RequestType::XMLHTTPREQUEST),
            redirect("https://www.youtube.com/user/someone/videos?view=0")
        );
    }

    #[test]
    fn youtube_depth_boundary() {
        let d = dispatcher();
        assert_eq!(eval(&d, "https://www.youtube.com/channel/"), Decision::NoAction);
        assert_eq!(eval(&d, "https://www.youtube.com/channel/UC123/playlists"), Decision::NoAction);
        assert_eq!(eval(&d, "https://www.youtube.com/channel/UC123/videos?view=0"), Decision::NoAction);
        assert_eq!(
            d.evaluate_url("https://www.youtube.com/channel/UC123", RequestType::IMAGE),
            Decision::NoAction
        );
    }

    #[test]
    fn wikipedia_goes_mobile_once() {
        let d = dispatcher();
        let first = eval(&d, "https://de.wikipedia.org/wiki/Test");
        assert_eq!(first, redirect("https://de.m.wikipedia.org/wiki/Test"));
        let second = eval(&d, first.redirect_url().unwrap());
        assert_eq!(second, Decision::NoAction);
    }

    #[test]
    fn imdb_and_mdn_prefixes() {
        let d = dispatcher();
        assert_eq!(
            eval(&d, "https://m.imdb.com/title/tt0111161/"),
            redirect("https://imdb.com/title/tt0111161/")
        );
        assert_eq!(
            eval(&d, "https://developer.mozilla.org/de/docs/Web/HTTP"),
            redirect("https://developer.mozilla.org/en-US/docs/Web/HTTP")
        );
        assert_eq!(eval(&d, "https://developer.mozilla.org/fr/docs/Web"), Decision::NoAction);
    }

    #[test]
    fn original_image_variants() {
        let d = dispatcher();
        assert_eq!(
            eval(&d, "https://pbs.twimg.com/media/Ab12.jpg?format=jpg&name=small"),
            redirect("https://pbs.twimg.com/media/Ab12.jpg?format=jpg&name=orig")
        );
        assert_eq!(
            eval(&d, "https://pbs.twimg.com/media/Ab12.jpg?format=jpg&name=orig"),
            Decision::NoAction
        );
        assert_eq!(
            eval(&d, "https://i1.sndcdn.com/artworks-000123-abc-t500x500.jpg"),
            redirect("https://i1.sndcdn.com/artworks-000123-abc-original.jpg")
        );
    }

    #[test]
    fn pixiv_jump_pages_unwrap() {
        let d = dispatcher();
        assert_eq!(
            eval(&d, "https://www.pixiv.net/jump.php?url=https%3A%2F%2Fexample.com"),
            redirect("https://example.com")
        );
        assert_eq!(
            eval(&d, "https://www.pixiv.net/jump.php?https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"),
            redirect("https://example.com/a?b=c")
        );
        assert_eq!(eval(&d, "https://www.pixiv.net/jump.php?url=%E0%A4%A"), Decision::NoAction);
    }

    #[test]
    fn pixiv_jump_never_yields_padded_or_scriptable_targets() {
        let d = dispatcher();
        for url in [
            "https://www.pixiv.net/jump.php?url=%20https%3A%2F%2Fexample.com%0A",
            "https://www.pixiv.net/jump.php?url=https%3A%2F%2Fexa%09mple.com",
            "https://www.pixiv.net/jump.php?javascript%3Aalert(1)",
        ] {
            assert_eq!(eval(&d, url), Decision::NoAction, "{url}");
        }
    }

    #[test]
    fn pixiv_specific_prefix_is_registered_first() {
        let registry = builtin_registry().unwrap();
        let position = |name: &str| registry.rules().iter().position(|r| r.name() == name);
        assert!(position("pixiv-jump-url").unwrap() < position("pixiv-jump").unwrap());

        let d = Dispatcher::new(registry);
        let result = d.evaluate_detailed(&Request::new(
            "https://www.pixiv.net/jump.php?url=https%3A%2F%2Fexample.com",
            RequestType::MAIN_FRAME,
        ));
        assert_eq!(d.registry().get(result.rule_id).map(|r| r.name()), Some("pixiv-jump-url"));
    }

    #[test]
    fn artstation_custom_domains() {
        let d = dispatcher();
        assert_eq!(
            eval(&d, "https://someartist.artstation.com/"),
            redirect("https://artstation.com/someartist")
        );
        assert_eq!(eval(&d, "https://www.artstation.com/"), Decision::NoAction);
        assert_eq!(
            eval(&d, "https://someartist.artstation.com/projects/AbC12"),
            redirect("https://artstation.com/artwork/AbC12")
        );
        assert_eq!(eval(&d, "https://someartist.artstation.com/projects/"), Decision::NoAction);
    }

    #[test]
    fn artstation_query_without_slash_matches_canonical_form() {
        let d = dispatcher();
        assert_eq!(eval(&d, "https://someone.artstation.com?x=1"), Decision::NoAction);
        assert_eq!(eval(&d, "https://someone.artstation.com/?x=1"), Decision::NoAction);
    }

    #[test]
    fn artstation_bare_domain_uses_leading_label() {
        // The bare domain is in scope of `*.artstation.com` and keeps the
        // leading-label behavior.
        let d = dispatcher();
        assert_eq!(
            eval(&d, "https://artstation.com/"),
            redirect("https://artstation.com/artstation")
        );
    }

    #[test]
    fn unrelated_requests_pass_through() {
        let d = dispatcher();
        assert_eq!(eval(&d, "https://example.com/"), Decision::NoAction);
        assert_eq!(eval(&d, "http://m.imdb.com/title/tt1/"), Decision::NoAction);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let d = dispatcher();
        for url in [
            "https://www.youtube.com/c/Name",
            "https://en.wikipedia.org/wiki/Rust",
            "https://www.pixiv.net/jump.php?url=https%3A%2F%2Fexample.com",
        ] {
            assert_eq!(eval(&d, url), eval(&d, url));
        }
    }
}
