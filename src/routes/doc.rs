use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AdminProfile, LoginRequest, LoginResponse},
        chat::{ChatReply, ChatRequest, ChatTestReply, ChatbotStatus},
        content::{
            CreateCarouselImageRequest, CreateNewsRequest, CreatePageContentRequest,
            UpdateCarouselImageRequest, UpdateNewsRequest, UpdatePageContentRequest,
        },
        dashboard::{DashboardStats, UploadedImage},
        inbox::{
            ContactRequest, JobApplicationRequest, NewsletterSendReport, NewsletterSendRequest,
            SubscribeRequest, SubscribeResponse,
        },
        notifications::{AffectedRows, UnreadSummary},
        orders::{CreateOrderRequest, OrderItemRequest, OrderStats, UpdateOrderStatusRequest},
        products::{
            CreateCategoryRequest, CreateProductRequest, CreateSpecialRequest,
            UpdateCategoryRequest, UpdateProductRequest,
        },
        reservations::{
            CreateReservationRequest, ReservationStats, UpdateReservationRequest,
            UpdateReservationStatusRequest,
        },
    },
    error::ErrorData,
    models::{
        AuditEntry, Availability, CarouselImage, Category, ContactMessage, JobApplication,
        NewsArticle, NewsletterSubscriber, Notification, Order, OrderItem, PageContent, Product,
        Reservation, Special, TimeSlot,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, catalog, chat, content, health, inbox, notifications, orders, reservations,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::list_products,
        catalog::get_product,
        catalog::list_specials,
        catalog::list_categories,
        catalog::admin_list_products,
        catalog::create_product,
        catalog::update_product,
        catalog::delete_product,
        catalog::admin_list_specials,
        catalog::create_special,
        catalog::delete_special,
        catalog::admin_list_categories,
        catalog::create_category,
        catalog::update_category,
        catalog::delete_category,
        orders::create_order,
        orders::list_orders,
        orders::order_stats,
        orders::update_order_status,
        orders::delete_order,
        reservations::availability,
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::reservation_stats,
        reservations::update_reservation,
        reservations::update_reservation_status,
        reservations::delete_reservation,
        content::list_news,
        content::get_article,
        content::list_carousel,
        content::list_page_content,
        content::admin_list_news,
        content::create_article,
        content::update_article,
        content::delete_article,
        content::admin_list_carousel,
        content::create_carousel_image,
        content::update_carousel_image,
        content::delete_carousel_image,
        content::admin_list_page_content,
        content::create_page_content,
        content::update_page_content,
        content::delete_page_content,
        inbox::submit_contact,
        inbox::subscribe,
        inbox::apply_for_job,
        inbox::list_contacts,
        inbox::delete_contact,
        inbox::list_subscribers,
        inbox::remove_subscriber,
        inbox::send_newsletter,
        inbox::list_job_applications,
        inbox::delete_job_application,
        notifications::list_notifications,
        notifications::unread_summary,
        notifications::mark_read,
        notifications::mark_all_read,
        notifications::delete_notification,
        notifications::clear_all,
        chat::chat,
        chat::test_chatbot,
        chat::chatbot_status,
        admin::login,
        admin::dashboard,
        admin::upload_image
    ),
    components(
        schemas(
            Product,
            Category,
            Special,
            Order,
            OrderItem,
            Reservation,
            TimeSlot,
            Availability,
            NewsArticle,
            CarouselImage,
            PageContent,
            ContactMessage,
            NewsletterSubscriber,
            JobApplication,
            Notification,
            AuditEntry,
            LoginRequest,
            LoginResponse,
            AdminProfile,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateSpecialRequest,
            CreateOrderRequest,
            OrderItemRequest,
            UpdateOrderStatusRequest,
            OrderStats,
            CreateReservationRequest,
            UpdateReservationRequest,
            UpdateReservationStatusRequest,
            ReservationStats,
            CreateNewsRequest,
            UpdateNewsRequest,
            CreateCarouselImageRequest,
            UpdateCarouselImageRequest,
            CreatePageContentRequest,
            UpdatePageContentRequest,
            ContactRequest,
            SubscribeRequest,
            SubscribeResponse,
            NewsletterSendRequest,
            NewsletterSendReport,
            JobApplicationRequest,
            UnreadSummary,
            AffectedRows,
            ChatRequest,
            ChatReply,
            ChatTestReply,
            ChatbotStatus,
            DashboardStats,
            UploadedImage,
            health::HealthData,
            ErrorData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<Order>,
            ApiResponse<Reservation>,
            ApiResponse<Availability>,
            ApiResponse<ErrorData>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Products, categories and daily specials"),
        (name = "Orders", description = "Customer orders"),
        (name = "Reservations", description = "Table bookings and availability"),
        (name = "Content", description = "News, carousel and editable page blocks"),
        (name = "Inbox", description = "Contact form, newsletter and job applications"),
        (name = "Chat", description = "Virtual assistant"),
        (name = "Notifications", description = "Admin notification feed"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
