//! Reconstruction of nested reply threads from flat parent-referencing rows.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::Comment;

/// A comment together with its nested replies.
#[derive(Debug, Clone)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<CommentThread>,
}

/// Build nested threads from a flat comment list.
///
/// Each comment is appended to its parent's reply list when the parent
/// resolves within the input set. A comment whose parent is missing
/// (deleted, or belonging to another post) is promoted to a root thread.
/// Sibling order follows the input order; reply lists are not re-sorted.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentThread> {
    let ids: HashSet<Uuid> = comments.iter().map(|c| c.id).collect();

    let mut children: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    let mut roots: Vec<Comment> = Vec::new();

    for comment in comments {
        match comment.parent_id {
            Some(parent_id) if parent_id != comment.id && ids.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(comment);
            }
            Some(parent_id) => {
                tracing::warn!(
                    comment_id = %comment.id,
                    parent_id = %parent_id,
                    "orphaned comment promoted to root"
                );
                roots.push(comment);
            }
            None => roots.push(comment),
        }
    }

    roots
        .into_iter()
        .map(|c| into_thread(c, &mut children))
        .collect()
}

fn into_thread(comment: Comment, children: &mut HashMap<Uuid, Vec<Comment>>) -> CommentThread {
    let replies = children
        .remove(&comment.id)
        .unwrap_or_default()
        .into_iter()
        .map(|c| into_thread(c, children))
        .collect();

    CommentThread { comment, replies }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn comment(id: Uuid, parent_id: Option<Uuid>, content: &str) -> Comment {
        Comment {
            id,
            post_id: Uuid::new_v4(),
            parent_id,
            author_name: "Ada".to_owned(),
            author_username: "ada".to_owned(),
            author_avatar: None,
            content: content.to_owned(),
            likes: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn nests_replies_under_parent() {
        let root_id = Uuid::new_v4();
        let reply_id = Uuid::new_v4();
        let flat = vec![
            comment(reply_id, Some(root_id), "reply"),
            comment(root_id, None, "root"),
        ];

        let tree = build_tree(flat);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].comment.id, root_id);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].comment.id, reply_id);
    }

    #[test]
    fn promotes_orphan_to_root() {
        let missing_parent = Uuid::new_v4();
        let orphan_id = Uuid::new_v4();
        let flat = vec![comment(orphan_id, Some(missing_parent), "orphan")];

        let tree = build_tree(flat);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].comment.id, orphan_id);
        assert!(tree[0].replies.is_empty());
    }

    #[test]
    fn preserves_input_order_within_a_level() {
        let root = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let flat = vec![
            comment(first, Some(root), "newest"),
            comment(second, Some(root), "older"),
            comment(root, None, "root"),
        ];

        let tree = build_tree(flat);

        let replies: Vec<Uuid> = tree[0].replies.iter().map(|t| t.comment.id).collect();
        assert_eq!(replies, vec![first, second]);
    }

    #[test]
    fn handles_deep_chains() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let flat = vec![
            comment(c, Some(b), "c"),
            comment(b, Some(a), "b"),
            comment(a, None, "a"),
        ];

        let tree = build_tree(flat);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].replies[0].replies[0].comment.id, c);
    }

    #[test]
    fn self_referencing_comment_becomes_root() {
        let id = Uuid::new_v4();
        let flat = vec![comment(id, Some(id), "loop")];

        let tree = build_tree(flat);

        assert_eq!(tree.len(), 1);
        assert!(tree[0].replies.is_empty());
    }
}
