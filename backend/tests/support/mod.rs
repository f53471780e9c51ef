//! In-memory adapters and app assembly shared by the API flow tests.
//!
//! One `MemoryStore` implements every driven port; the harness wires the real
//! domain services and route tree on top of it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;
use uuid::Uuid;

use backend::domain::ports::{
    AdminAccount, AdminRepository, AdminRepositoryError, AddressRepository,
    AddressRepositoryError, BookingRepository, BookingRepositoryError, CatalogueRepository,
    CatalogueRepositoryError, ClientRepository, ClientRepositoryError, CouponRepository,
    CouponRepositoryError, FixtureContentRepository, NewBooking, NewBookingItem, NewClient,
    NewVerificationCode, NoOpNotificationPublisher, NotificationRepository,
    NotificationRepositoryError, SmsError, SmsSender, VerificationCodeRepository,
    VerificationCodeRepositoryError,
};
use backend::domain::{
    Address, AddressServiceImpl, AddressUpdate, AdminId, AdminRole, AdminUser, AuthServiceImpl,
    Booking, BookingItem, BookingServiceImpl, BookingStatus, BookingWithItems, ClientUser,
    CouponServiceImpl, KnifeType, KnifeTypeUpdate, NewAddress, NewKnifeType, NewNotification,
    Notification, NotificationServiceImpl, OwnedCoupon, PhoneNumber, TokenCodec, UserCoupon,
    UserId, VerificationCode,
};
use backend::inbound::http::routes;
use backend::inbound::http::state::{HttpState, HttpStatePorts};

const TEST_SECRET: &[u8] = b"api-flow-test-secret-api-flow-test-secret-00";

/// Shared in-memory backing store for every repository port.
#[derive(Default)]
pub struct MemoryStore {
    clients: Mutex<Vec<ClientUser>>,
    admins: Mutex<Vec<AdminAccount>>,
    codes: Mutex<Vec<VerificationCode>>,
    knife_types: Mutex<Vec<KnifeType>>,
    bookings: Mutex<Vec<Booking>>,
    items: Mutex<Vec<BookingItem>>,
    notifications: Mutex<Vec<Notification>>,
    addresses: Mutex<Vec<Address>>,
    coupons: Mutex<Vec<OwnedCoupon>>,
    fail_next_item_insert: AtomicBool,
}

#[async_trait]
impl ClientRepository for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<ClientUser>, ClientRepositoryError> {
        Ok(self
            .clients
            .lock()
            .expect("lock")
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<ClientUser>, ClientRepositoryError> {
        Ok(self
            .clients
            .lock()
            .expect("lock")
            .iter()
            .find(|c| &c.phone == phone)
            .cloned())
    }

    async fn create(&self, client: NewClient) -> Result<ClientUser, ClientRepositoryError> {
        let mut clients = self.clients.lock().expect("lock");
        if clients.iter().any(|c| c.phone == client.phone) {
            return Err(ClientRepositoryError::duplicate_phone(
                client.phone.to_string(),
            ));
        }
        let row = ClientUser {
            id: UserId::random(),
            phone: client.phone,
            name: client.name,
            created_at: Utc::now(),
        };
        clients.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn find_by_id(&self, id: &AdminId) -> Result<Option<AdminUser>, AdminRepositoryError> {
        Ok(self
            .admins
            .lock()
            .expect("lock")
            .iter()
            .find(|a| &a.admin.id == id)
            .map(|a| a.admin.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        Ok(self
            .admins
            .lock()
            .expect("lock")
            .iter()
            .find(|a| a.admin.username == username)
            .cloned())
    }
}

#[async_trait]
impl VerificationCodeRepository for MemoryStore {
    async fn insert(
        &self,
        code: NewVerificationCode,
    ) -> Result<VerificationCode, VerificationCodeRepositoryError> {
        let row = VerificationCode {
            id: Uuid::new_v4(),
            phone: code.phone,
            code: code.code,
            purpose: code.purpose,
            expires_at: code.expires_at,
            used: false,
            created_at: Utc::now(),
        };
        self.codes.lock().expect("lock").push(row.clone());
        Ok(row)
    }

    async fn latest_unused(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError> {
        Ok(self
            .codes
            .lock()
            .expect("lock")
            .iter()
            .filter(|c| &c.phone == phone && !c.used)
            .next_back()
            .cloned())
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), VerificationCodeRepositoryError> {
        for code in self.codes.lock().expect("lock").iter_mut() {
            if code.id == id {
                code.used = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogueRepository for MemoryStore {
    async fn list_active(&self) -> Result<Vec<KnifeType>, CatalogueRepositoryError> {
        Ok(self
            .knife_types
            .lock()
            .expect("lock")
            .iter()
            .filter(|k| k.is_active)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<KnifeType>, CatalogueRepositoryError> {
        Ok(self.knife_types.lock().expect("lock").clone())
    }

    async fn find_active_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<KnifeType>, CatalogueRepositoryError> {
        Ok(self
            .knife_types
            .lock()
            .expect("lock")
            .iter()
            .filter(|k| k.is_active && ids.contains(&k.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: NewKnifeType) -> Result<KnifeType, CatalogueRepositoryError> {
        let row = KnifeType {
            id: Uuid::new_v4(),
            name: entry.name,
            market_price: entry.market_price,
            discount_price: entry.discount_price,
            image_url: entry.image_url,
            is_active: true,
            display_order: entry.display_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.knife_types.lock().expect("lock").push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        update: KnifeTypeUpdate,
    ) -> Result<Option<KnifeType>, CatalogueRepositoryError> {
        let mut rows = self.knife_types.lock().expect("lock");
        for row in rows.iter_mut() {
            if row.id == id {
                if let Some(name) = update.name {
                    row.name = name;
                }
                if let Some(price) = update.market_price {
                    row.market_price = price;
                }
                if let Some(price) = update.discount_price {
                    row.discount_price = price;
                }
                if let Some(order) = update.display_order {
                    row.display_order = order;
                }
                if let Some(active) = update.is_active {
                    row.is_active = active;
                }
                row.updated_at = Utc::now();
                return Ok(Some(row.clone()));
            }
        }
        Ok(None)
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, CatalogueRepositoryError> {
        let mut rows = self.knife_types.lock().expect("lock");
        for row in rows.iter_mut() {
            if row.id == id {
                row.is_active = false;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError> {
        let row = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            booking_date: booking.booking_date,
            booking_time: booking.booking_time,
            total_quantity: booking.total_quantity,
            total_amount: booking.total_amount,
            status: booking.status,
            special_instructions: booking.special_instructions,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.bookings.lock().expect("lock").push(row.clone());
        Ok(row)
    }

    async fn insert_items(
        &self,
        booking_id: Uuid,
        items: &[NewBookingItem],
    ) -> Result<Vec<BookingItem>, BookingRepositoryError> {
        if self.fail_next_item_insert.swap(false, Ordering::SeqCst) {
            return Err(BookingRepositoryError::query("injected item insert failure"));
        }
        let rows: Vec<BookingItem> = items
            .iter()
            .map(|item| BookingItem {
                id: Uuid::new_v4(),
                booking_id,
                knife_type_id: item.knife_type_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
            })
            .collect();
        self.items.lock().expect("lock").extend(rows.clone());
        Ok(rows)
    }

    async fn delete_booking(&self, booking_id: Uuid) -> Result<(), BookingRepositoryError> {
        self.bookings
            .lock()
            .expect("lock")
            .retain(|b| b.id != booking_id);
        self.items
            .lock()
            .expect("lock")
            .retain(|i| i.booking_id != booking_id);
        Ok(())
    }

    async fn find_for_user(
        &self,
        booking_id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(self
            .bookings
            .lock()
            .expect("lock")
            .iter()
            .find(|b| b.id == booking_id && &b.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BookingWithItems>, BookingRepositoryError> {
        let bookings = self.bookings.lock().expect("lock");
        let items = self.items.lock().expect("lock");
        Ok(bookings
            .iter()
            .filter(|b| &b.user_id == user_id)
            .map(|b| BookingWithItems {
                booking: b.clone(),
                items: items
                    .iter()
                    .filter(|i| i.booking_id == b.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<BookingWithItems>, BookingRepositoryError> {
        let bookings = self.bookings.lock().expect("lock");
        let items = self.items.lock().expect("lock");
        Ok(bookings
            .iter()
            .map(|b| BookingWithItems {
                booking: b.clone(),
                items: items
                    .iter()
                    .filter(|i| i.booking_id == b.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn set_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut bookings = self.bookings.lock().expect("lock");
        for booking in bookings.iter_mut() {
            if booking.id == booking_id {
                booking.status = status;
                booking.updated_at = Utc::now();
                return Ok(Some(booking.clone()));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, NotificationRepositoryError> {
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            related_booking_id: notification.related_booking_id,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.lock().expect("lock").push(row.clone());
        Ok(row)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(self
            .notifications
            .lock()
            .expect("lock")
            .iter()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<i64, NotificationRepositoryError> {
        let count = self
            .notifications
            .lock()
            .expect("lock")
            .iter()
            .filter(|n| &n.user_id == user_id && !n.is_read)
            .count();
        Ok(i64::try_from(count).expect("count fits i64"))
    }

    async fn mark_read(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut rows = self.notifications.lock().expect("lock");
        for row in rows.iter_mut() {
            if row.id == id && &row.user_id == user_id {
                row.is_read = true;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
    ) -> Result<usize, NotificationRepositoryError> {
        let mut rows = self.notifications.lock().expect("lock");
        let mut updated = 0;
        for row in rows.iter_mut() {
            if &row.user_id == user_id && !row.is_read {
                row.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Address>, AddressRepositoryError> {
        Ok(self
            .addresses
            .lock()
            .expect("lock")
            .iter()
            .filter(|a| &a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Address>, AddressRepositoryError> {
        Ok(self
            .addresses
            .lock()
            .expect("lock")
            .iter()
            .find(|a| a.id == id && &a.user_id == user_id)
            .cloned())
    }

    async fn insert(
        &self,
        user_id: &UserId,
        address: NewAddress,
    ) -> Result<Address, AddressRepositoryError> {
        let row = Address {
            id: Uuid::new_v4(),
            user_id: *user_id,
            address_name: address.address_name,
            address: address.address,
            detail_address: address.detail_address,
            is_default: address.is_default,
            address_type: address.address_type,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.addresses.lock().expect("lock").push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: &UserId,
        update: AddressUpdate,
    ) -> Result<Option<Address>, AddressRepositoryError> {
        let mut rows = self.addresses.lock().expect("lock");
        for row in rows.iter_mut() {
            if row.id == id && &row.user_id == user_id {
                if let Some(name) = update.address_name {
                    row.address_name = name;
                }
                if let Some(address) = update.address {
                    row.address = address;
                }
                if let Some(detail) = update.detail_address {
                    row.detail_address = Some(detail);
                }
                if let Some(is_default) = update.is_default {
                    row.is_default = is_default;
                }
                if let Some(kind) = update.address_type {
                    row.address_type = kind;
                }
                row.updated_at = Utc::now();
                return Ok(Some(row.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, id: Uuid, user_id: &UserId) -> Result<bool, AddressRepositoryError> {
        let mut rows = self.addresses.lock().expect("lock");
        let before = rows.len();
        rows.retain(|a| !(a.id == id && &a.user_id == user_id));
        Ok(rows.len() != before)
    }

    async fn clear_default(&self, user_id: &UserId) -> Result<(), AddressRepositoryError> {
        for row in self.addresses.lock().expect("lock").iter_mut() {
            if &row.user_id == user_id {
                row.is_default = false;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CouponRepository for MemoryStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OwnedCoupon>, CouponRepositoryError> {
        Ok(self
            .coupons
            .lock()
            .expect("lock")
            .iter()
            .filter(|c| &c.coupon.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<UserCoupon>, CouponRepositoryError> {
        Ok(self
            .coupons
            .lock()
            .expect("lock")
            .iter()
            .find(|c| c.coupon.id == id && &c.coupon.user_id == user_id)
            .map(|c| c.coupon.clone()))
    }

    async fn mark_used(&self, id: Uuid, user_id: &UserId) -> Result<bool, CouponRepositoryError> {
        let mut rows = self.coupons.lock().expect("lock");
        for row in rows.iter_mut() {
            if row.coupon.id == id && &row.coupon.user_id == user_id && !row.coupon.is_used {
                row.coupon.is_used = true;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// SMS sender that records outgoing bodies for the tests to fish codes from.
#[derive(Default)]
pub struct RecordingSms {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, _to: &PhoneNumber, body: &str) -> Result<(), SmsError> {
        self.sent.lock().expect("lock").push(body.to_owned());
        Ok(())
    }
}

/// Test harness bundling the store, the SMS recorder, and the app state.
pub struct Harness {
    store: Arc<MemoryStore>,
    sms: Arc<RecordingSms>,
    state: web::Data<HttpState>,
}

impl Harness {
    /// Wire the real services over the in-memory store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let sms = Arc::new(RecordingSms::default());
        let clock = Arc::new(DefaultClock);
        let codec = Arc::new(TokenCodec::new(TEST_SECRET));

        let notifications = Arc::new(NotificationServiceImpl::new(
            store.clone(),
            Arc::new(NoOpNotificationPublisher),
        ));
        let auth = Arc::new(AuthServiceImpl::new(
            store.clone(),
            store.clone(),
            store.clone(),
            sms.clone(),
            codec.clone(),
            clock.clone(),
        ));
        let bookings = Arc::new(BookingServiceImpl::new(
            store.clone(),
            store.clone(),
            notifications.clone(),
        ));
        let addresses = Arc::new(AddressServiceImpl::new(store.clone()));
        let coupons = Arc::new(CouponServiceImpl::new(store.clone(), clock));

        let ports = HttpStatePorts {
            auth,
            bookings,
            notifications,
            addresses,
            coupons,
            catalogue: store.clone(),
            content: Arc::new(FixtureContentRepository),
        };
        let state = web::Data::new(HttpState::new(ports, codec, false));
        Self { store, sms, state }
    }

    /// Build a fresh in-process app sharing this harness's state.
    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .app_data(self.state.clone())
                .configure(routes::configure),
        )
        .await
    }

    /// The six-digit code inside the most recently sent SMS, if any.
    pub fn last_sms_code(&self) -> Option<String> {
        let sent = self.sms.sent.lock().expect("lock");
        let body = sent.last()?;
        let digits: String = body.chars().filter(char::is_ascii_digit).collect();
        // The message embeds exactly one six-digit code plus the "5 minutes"
        // copy; take the leading run of six.
        body.split_whitespace()
            .find(|word| {
                let trimmed = word.trim_end_matches('.');
                trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_digit())
            })
            .map(|word| word.trim_end_matches('.').to_owned())
            .or_else(|| (digits.len() >= 6).then(|| digits[..6].to_owned()))
    }

    /// Seed an active catalogue entry and return its id.
    pub fn seed_knife_type(&self, name: &str, discount_price: i64) -> Uuid {
        let id = Uuid::new_v4();
        self.store.knife_types.lock().expect("lock").push(KnifeType {
            id,
            name: name.into(),
            market_price: discount_price * 2,
            discount_price,
            image_url: None,
            is_active: true,
            display_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    /// Overwrite a catalogue entry's sale price.
    pub fn set_price(&self, id: Uuid, discount_price: i64) {
        for row in self.store.knife_types.lock().expect("lock").iter_mut() {
            if row.id == id {
                row.discount_price = discount_price;
            }
        }
    }

    /// Soft-delete a catalogue entry.
    pub fn deactivate_knife_type(&self, id: Uuid) {
        for row in self.store.knife_types.lock().expect("lock").iter_mut() {
            if row.id == id {
                row.is_active = false;
            }
        }
    }

    /// Seed an admin account with a bcrypt-hashed password.
    pub fn seed_admin(&self, username: &str, password: &str, name: &str) {
        let hash = bcrypt::hash(password, 4).expect("hash password");
        self.store.admins.lock().expect("lock").push(AdminAccount {
            admin: AdminUser {
                id: AdminId::random(),
                username: username.into(),
                name: name.into(),
                role: AdminRole::Admin,
            },
            password_hash: hash,
        });
    }

    /// Make the next booking item insert fail (compensation testing).
    pub fn fail_next_item_insert(&self) {
        self.store
            .fail_next_item_insert
            .store(true, Ordering::SeqCst);
    }

    /// Number of booking rows currently persisted.
    pub fn booking_count(&self) -> usize {
        self.store.bookings.lock().expect("lock").len()
    }
}
