//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ルーム → メンバー と 接続 → ルーム の 2 つのインデックスを同じロックで保持し、
//! 全ルームからの退出をメンバー数に比例するコストで行えるようにしています。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomName, RoomRepository};

#[derive(Debug, Default)]
struct RoomIndex {
    members: HashMap<RoomName, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<RoomName>>,
}

impl RoomIndex {
    fn remove(&mut self, connection_id: ConnectionId, room: &RoomName) -> bool {
        let removed = match self.members.get_mut(room) {
            Some(members) => {
                let removed = members.remove(&connection_id);
                if members.is_empty() {
                    self.members.remove(room);
                }
                removed
            }
            None => false,
        };

        if let Some(rooms) = self.memberships.get_mut(&connection_id) {
            rooms.remove(room);
            if rooms.is_empty() {
                self.memberships.remove(&connection_id);
            }
        }

        removed
    }
}

/// インメモリ Room Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryRoomRepository {
    index: Mutex<RoomIndex>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(&self, connection_id: ConnectionId, room: RoomName) -> bool {
        let mut index = self.index.lock().await;
        index
            .memberships
            .entry(connection_id)
            .or_default()
            .insert(room.clone());
        index.members.entry(room).or_default().insert(connection_id)
    }

    async fn leave(&self, connection_id: ConnectionId, room: &RoomName) -> bool {
        let mut index = self.index.lock().await;
        index.remove(connection_id, room)
    }

    async fn leave_all(&self, connection_id: ConnectionId) -> Vec<RoomName> {
        let mut index = self.index.lock().await;
        let rooms: Vec<RoomName> = index
            .memberships
            .remove(&connection_id)
            .map(|rooms| rooms.into_iter().collect())
            .unwrap_or_default();

        for room in &rooms {
            index.remove(connection_id, room);
        }

        rooms
    }

    async fn members(&self, room: &RoomName) -> Vec<ConnectionId> {
        let index = self.index.lock().await;
        index
            .members
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    async fn rooms_of(&self, connection_id: ConnectionId) -> Vec<RoomName> {
        let index = self.index.lock().await;
        let mut rooms: Vec<RoomName> = index
            .memberships
            .get(&connection_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    async fn count_rooms(&self) -> usize {
        let index = self.index.lock().await;
        index.members.len()
    }
}
