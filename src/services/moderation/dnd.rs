use crate::error::Error;
use crate::store::models::UserId;
use crate::store::Store;

/// Flip a user's do-not-disturb membership. Returns true when the user is
/// now opted out of direct notifications.
pub async fn toggle(store: &Store, user: UserId) -> Result<bool, Error> {
    store
        .mutate(|snap| {
            if snap.rdm_users.remove(&user) {
                false
            } else {
                snap.rdm_users.insert(user);
                true
            }
        })
        .await
}

pub async fn is_opted_out(store: &Store, user: UserId) -> bool {
    store.read(|snap| snap.rdm_users.contains(&user)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggle_flips_membership() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data.json")).await.unwrap();

        assert!(!is_opted_out(&store, UserId(9)).await);
        assert!(toggle(&store, UserId(9)).await.unwrap());
        assert!(is_opted_out(&store, UserId(9)).await);
        assert!(!toggle(&store, UserId(9)).await.unwrap());
        assert!(!is_opted_out(&store, UserId(9)).await);
    }
}
