//! Property-based tests for reference parsing and URL resolution.
//!
//! These tests use proptest to generate random repository references and
//! verify that the parser invariants hold for every generated shape.

#[cfg(test)]
mod proptest_tests {
    use std::path::{Component, Path};

    use crate::error::Error;
    use crate::reference::{ReferenceParser, Scheme};
    use proptest::prelude::*;

    const NAME: &str = "[A-Za-z0-9_][A-Za-z0-9_-]{0,20}";
    const BRANCH: &str = "[0-9]{1,2}\\.[0-9]";
    const HOST: &str = "[a-z]{1,10}\\.(com|org|io)";

    proptest! {
        /// Property: a bare name takes the default organization and names its folder
        #[test]
        fn bare_name_uses_defaults(name in NAME) {
            let reference = ReferenceParser::default().parse(&name, None).unwrap();
            prop_assert_eq!(reference.organization, "OCA");
            prop_assert_eq!(&reference.repository_name, &name);
            prop_assert_eq!(&reference.local_folder, &name);
            prop_assert_eq!(reference.branch, None);
        }

        /// Property: a bare name inherits the parent's branch unchanged
        #[test]
        fn bare_name_inherits_parent_branch(name in NAME, branch in BRANCH) {
            let reference = ReferenceParser::default().parse(&name, Some(&branch)).unwrap();
            prop_assert_eq!(reference.branch, Some(branch));
        }

        /// Property: `org/name` splits into organization and repository
        #[test]
        fn org_name_pair(org in NAME, name in NAME) {
            let reference = ReferenceParser::default()
                .parse(&format!("{}/{}", org, name), None)
                .unwrap();
            prop_assert_eq!(reference.organization, org);
            prop_assert_eq!(reference.repository_name, name);
        }

        /// Property: HTTPS URLs round-trip through resolve_url with a `.git` suffix
        #[test]
        fn https_url_round_trips(
            host in HOST,
            org in NAME,
            name in NAME,
            suffix in prop::bool::ANY,
        ) {
            let url = format!(
                "https://{}/{}/{}{}",
                host,
                org,
                name,
                if suffix { ".git" } else { "" }
            );
            let reference = ReferenceParser::default().parse(&url, None).unwrap();
            prop_assert_eq!(&reference.host, &host);
            prop_assert_eq!(&reference.organization, &org);
            prop_assert_eq!(&reference.repository_name, &name);
            prop_assert_eq!(
                reference.resolve_url(),
                format!("https://{}/{}/{}.git", host, org, name)
            );
        }

        /// Property: SSH references keep the user in the host
        #[test]
        fn ssh_reference(user in "[a-z]{1,8}", host in HOST, org in NAME, name in NAME) {
            let token = format!("{}@{}:{}/{}", user, host, org, name);
            let reference = ReferenceParser::default().parse(&token, None).unwrap();
            prop_assert_eq!(reference.scheme, Scheme::Ssh);
            prop_assert_eq!(reference.host, format!("{}@{}", user, host));
            prop_assert_eq!(reference.organization, org);
            prop_assert_eq!(reference.repository_name, name);
        }

        /// Property: a folder override never changes what the URL says
        #[test]
        fn folder_override_only_changes_folder(folder in NAME, org in NAME, name in NAME) {
            let url = format!("https://github.com/{}/{}", org, name);
            let plain = ReferenceParser::default().parse(&url, None).unwrap();
            let renamed = ReferenceParser::default()
                .parse(&format!("{} {}", folder, url), None)
                .unwrap();
            prop_assert_eq!(&renamed.local_folder, &folder);
            prop_assert_eq!(renamed.resolve_url(), plain.resolve_url());
            prop_assert_eq!(renamed.branch, None);
        }

        /// Property: `repo branch` sets the branch and keeps the folder
        #[test]
        fn repo_and_branch(name in NAME, branch in BRANCH) {
            let reference = ReferenceParser::default()
                .parse(&format!("{} {}", name, branch), Some("1.0"))
                .unwrap();
            prop_assert_eq!(reference.branch, Some(branch));
            prop_assert_eq!(reference.local_folder, name);
        }

        /// Property: three tokens set folder, repository and branch together
        #[test]
        fn folder_repo_branch(folder in NAME, org in NAME, name in NAME, branch in BRANCH) {
            let reference = ReferenceParser::default()
                .parse(&format!("{} {}/{} {}", folder, org, name, branch), None)
                .unwrap();
            prop_assert_eq!(reference.local_folder, folder);
            prop_assert_eq!(reference.organization, org);
            prop_assert_eq!(reference.repository_name, name);
            prop_assert_eq!(reference.branch, Some(branch));
        }

        /// Property: more than three tokens is always rejected
        #[test]
        fn too_many_tokens_rejected(tokens in prop::collection::vec(NAME, 4..8)) {
            let result = ReferenceParser::default().parse(&tokens.join(" "), None);
            let is_parse_error = matches!(result, Err(Error::ReferenceParse { .. }));
            prop_assert!(is_parse_error);
        }

        /// Property: parsing is deterministic and the destination stays under the base
        #[test]
        fn destination_is_under_base(folder in NAME, org in NAME, name in NAME, branch in BRANCH) {
            let line = format!("{} {}/{} {}", folder, org, name, branch);
            let first = ReferenceParser::default().parse(&line, None).unwrap();
            let second = ReferenceParser::default().parse(&line, None).unwrap();
            prop_assert_eq!(&first, &second);
            let base = Path::new("/opt/odoo/additional_addons/");
            prop_assert!(first.destination(base).starts_with(base));
        }

        /// Property: any accepted line names exactly one plain directory under the base
        #[test]
        fn destination_is_one_plain_directory(
            folder in "[A-Za-z0-9_.-]{1,6}",
            org in "[A-Za-z0-9_.-]{1,6}",
            name in "[A-Za-z0-9_.-]{1,6}",
            three_tokens in any::<bool>(),
        ) {
            let line = if three_tokens {
                format!("{} {}/{} 8.0", folder, org, name)
            } else {
                format!("{}/{}", org, name)
            };
            if let Ok(reference) = ReferenceParser::default().parse(&line, None) {
                let base = Path::new("/opt/odoo/additional_addons/");
                let destination = reference.destination(base);
                let relative = destination.strip_prefix(base).unwrap();
                let components: Vec<_> = relative.components().collect();
                prop_assert_eq!(components.len(), 1);
                let is_plain = matches!(components[0], Component::Normal(_));
                prop_assert!(is_plain);
            }
        }
    }
}
