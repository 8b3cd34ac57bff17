// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Customers / Pets ---
        handlers::customers::list_customers,
        handlers::customers::get_my_profile,
        handlers::customers::set_blocked,
        handlers::customers::delete_customer,
        handlers::customers::list_pets,
        handlers::customers::create_pet,
        handlers::customers::delete_pet,
        handlers::customers::upload_pet_photo,

        // --- Catalog / Packages ---
        handlers::catalog::list_services,
        handlers::catalog::create_service,
        handlers::catalog::list_products,
        handlers::catalog::create_product,
        handlers::catalog::list_packages,
        handlers::catalog::create_package,
        handlers::catalog::delete_package,

        // --- Quotes ---
        handlers::quotes::create_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::update_quote_status,
        handlers::quotes::schedule_quote,
        handlers::quotes::delete_quote,

        // --- Appointments / Invoices ---
        handlers::appointments::list_appointments,
        handlers::appointments::update_appointment_status,
        handlers::appointments::list_invoices,
        handlers::appointments::invoice_pdf,
        handlers::appointments::record_payment,

        // --- Notifications ---
        handlers::notifications::subscribe,
        handlers::notifications::unsubscribe,
        handlers::notifications::list_subscriptions,
        handlers::notifications::inbox,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
        handlers::notifications::send_test,

        // --- Notification Settings (MASTER) ---
        handlers::notification_settings::list_settings,
        handlers::notification_settings::update_setting,
        handlers::notification_settings::user_preferences,
        handlers::notification_settings::update_user_preference,
        handlers::notification_settings::bulk_update_preferences,
        handlers::notification_settings::list_users,
        handlers::notification_settings::stats,

        // --- Cron ---
        handlers::cron::dispatch_notifications,

        // --- Support ---
        handlers::support::open_ticket,
        handlers::support::list_tickets,
        handlers::support::update_ticket_status,

        // --- HR ---
        handlers::hr::list_staff,
        handlers::hr::hire_staff,
        handlers::hr::create_pay_period,
        handlers::hr::list_pay_periods,
        handlers::hr::add_adjustment,
        handlers::hr::close_pay_period,
        handlers::hr::period_statements,
        handlers::hr::my_statements,

        // --- Time Tracking ---
        handlers::time_tracking::clock_in,
        handlers::time_tracking::clock_out,
        handlers::time_tracking::my_entries,
        handlers::time_tracking::all_entries,

        // --- AI ---
        handlers::ai::complete,

        // --- Admin ---
        handlers::admin::normalize_quote_statuses,
    ),
    components(
        schemas(
            // --- Health ---
            handlers::health::HealthResponse,
            handlers::health::HealthChecks,

            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Customers ---
            models::customer::Customer,
            models::customer::CustomerSummary,
            models::customer::Pet,
            models::customer::PhotoUploadResponse,

            // --- Catalog ---
            models::catalog::ServiceItem,
            models::catalog::Product,
            models::catalog::ServicePackage,

            // --- Quotes ---
            models::quote::QuoteStatus,
            models::quote::Quote,
            models::quote::NormalizationReport,

            // --- Appointments ---
            models::appointment::AppointmentStatus,
            models::appointment::InvoiceStatus,
            models::appointment::PaymentMethod,
            models::appointment::Appointment,
            models::appointment::Invoice,
            models::appointment::InvoiceLine,
            models::appointment::Payment,
            models::appointment::PaymentReceipt,
            models::appointment::AppointmentStatusChange,

            // --- Notifications ---
            models::notification::NotificationType,
            models::notification::Notification,
            models::notification::NotificationInbox,
            models::notification::NotificationSubscription,
            models::notification::NotificationSetting,
            models::notification::NotificationPreference,
            models::notification::UserNotificationSummary,
            models::notification::NotificationTypeCount,
            models::notification::NotificationStats,
            models::notification::DispatchReport,

            // --- Support ---
            models::support::TicketStatus,
            models::support::SupportTicket,

            // --- HR ---
            models::hr::PayPeriodStatus,
            models::hr::Staff,
            models::hr::StaffSummary,
            models::hr::TimeEntry,
            models::hr::PayPeriod,
            models::hr::PayAdjustment,
            models::hr::PayStatement,
            models::hr::ClosedPeriod,

            // --- Payloads ---
            handlers::customers::BlockCustomerPayload,
            handlers::customers::CreatePetPayload,
            handlers::catalog::CreateServicePayload,
            handlers::catalog::CreateProductPayload,
            handlers::catalog::CreatePackagePayload,
            handlers::quotes::CreateQuotePayload,
            handlers::quotes::UpdateQuoteStatusPayload,
            handlers::quotes::ScheduleQuotePayload,
            handlers::appointments::UpdateAppointmentStatusPayload,
            handlers::appointments::RecordPaymentPayload,
            handlers::notifications::SubscriptionKeys,
            handlers::notifications::SubscribePayload,
            handlers::notifications::UnsubscribePayload,
            handlers::notifications::UpdatedCount,
            handlers::notifications::TestNotificationResponse,
            handlers::notification_settings::ToggleNotificationPayload,
            handlers::notification_settings::BulkPreferencePayload,
            handlers::support::OpenTicketPayload,
            handlers::support::UpdateTicketStatusPayload,
            handlers::hr::HireStaffPayload,
            handlers::hr::CreatePayPeriodPayload,
            handlers::hr::AdjustmentPayload,
            handlers::ai::CompletionPayload,
            handlers::ai::CompletionResponse,
        )
    ),
    tags(
        (name = "Health", description = "Status do serviço"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Customers", description = "Clientes"),
        (name = "Pets", description = "Pets dos clientes"),
        (name = "Catalog", description = "Serviços e Produtos"),
        (name = "Packages", description = "Pacotes de Serviços"),
        (name = "Quotes", description = "Orçamentos"),
        (name = "Appointments", description = "Agendamentos"),
        (name = "Invoices", description = "Faturas e Pagamentos"),
        (name = "Notifications", description = "Notificações e Web Push"),
        (name = "Notification Settings", description = "Configuração de Notificações (MASTER)"),
        (name = "Cron", description = "Disparos agendados"),
        (name = "Support", description = "Chamados de Suporte"),
        (name = "HR", description = "Funcionários e Folha de Pagamento"),
        (name = "Time Tracking", description = "Registro de Ponto"),
        (name = "AI", description = "Geração de Texto"),
        (name = "Admin", description = "Manutenção de Dados (MASTER)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
        // Segredo compartilhado do agendador externo
        components.add_security_scheme(
            "cron_secret",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
