// storefront/src/services/mailer.rs

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use stockline::{Notifier, Order, OrderStatus};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub html_body: String,
}

#[derive(Debug)]
pub struct SentEmailInfo {
  pub to: String,
  pub subject: String,
  pub body_preview: String, // First N chars of body
  pub message_id: String,
}

/// Where rendered mail goes. Production wiring uses [`MockMailTransport`]; a real SMTP
/// client slots in behind the same trait.
#[async_trait]
pub trait MailTransport: Send + Sync {
  async fn send(&self, mail: OutgoingMail) -> anyhow::Result<SentEmailInfo>;
}

/// Logs the mail, simulates latency, and fails when the subject contains `fail_test`.
#[derive(Debug, Clone, Default)]
pub struct MockMailTransport;

#[async_trait]
impl MailTransport for MockMailTransport {
  async fn send(&self, mail: OutgoingMail) -> anyhow::Result<SentEmailInfo> {
    info!(
      "Simulating sending email: To='{}', From='{}', Subject='{}'",
      mail.to, mail.from, mail.subject
    );
    tokio::time::sleep(std::time::Duration::from_millis(20)).await; // Simulate network latency

    if mail.subject.to_lowercase().contains("fail_test") {
      warn!("Simulated email failure for subject: {}", mail.subject);
      anyhow::bail!("Simulated email send failure");
    }

    let body_preview = mail.html_body.chars().take(50).collect::<String>() + "...";
    let message_id = format!("mock_email_{}", uuid::Uuid::new_v4());
    info!("Mock email sent successfully. Message ID: {}", message_id);

    Ok(SentEmailInfo {
      to: mail.to,
      subject: mail.subject,
      body_preview,
      message_id,
    })
  }
}

/// Renders order mail and hands it to a [`MailTransport`].
#[derive(Clone)]
pub struct MailNotifier {
  transport: Arc<dyn MailTransport>,
  from: String,
  admin_email: String,
  frontend_url: String,
}

impl MailNotifier {
  pub fn new(transport: Arc<dyn MailTransport>, config: &AppConfig) -> Self {
    Self {
      transport,
      from: config.mail_from.clone(),
      admin_email: config.admin_email.clone(),
      frontend_url: config.frontend_url.clone(),
    }
  }

  pub fn tracking_link(&self, order: &Order) -> String {
    format!("{}/track-order?code={}", self.frontend_url, order.order_number)
  }

  pub fn confirmation_mail(&self, order: &Order) -> OutgoingMail {
    let link = self.tracking_link(order);
    OutgoingMail {
      to: order.contact_email.clone(),
      from: self.from.clone(),
      subject: format!("Order received #{}", order.order_number),
      html_body: format!(
        "<h2>We received your order!</h2>\
         <p>Your order has been placed and will be prepared once payment is confirmed.</p>\
         <p><strong>Order number:</strong> {number}</p>\
         <p><strong>Total:</strong> {total}</p>\
         <h3>Track your order</h3>\
         <p>No account needed, just follow this link:</p>\
         <a href=\"{link}\">Track my order</a>\
         <p><small>If the button does not work: {link}</small></p>",
        number = order.order_number,
        total = order.final_amount,
        link = link,
      ),
    }
  }

  pub fn admin_mail(&self, order: &Order) -> OutgoingMail {
    OutgoingMail {
      to: self.admin_email.clone(),
      from: self.from.clone(),
      subject: "New order received".to_string(),
      html_body: format!(
        "<h3>New order!</h3>\
         <ul>\
         <li><strong>Order number:</strong> {}</li>\
         <li><strong>Total:</strong> {}</li>\
         <li><strong>Customer email:</strong> {}</li>\
         </ul>\
         <p>Review it in the admin panel.</p>",
        order.order_number, order.final_amount, order.contact_email
      ),
    }
  }

  pub fn status_mail(&self, order: &Order, new_status: OrderStatus) -> OutgoingMail {
    let message = match new_status {
      OrderStatus::Preparing => "Your order is being prepared.".to_string(),
      OrderStatus::Shipped => "Your order has been shipped!".to_string(),
      OrderStatus::Delivered => "Your order has been delivered.".to_string(),
      OrderStatus::Cancelled => "Your order has been cancelled.".to_string(),
      other => format!("Your order status was updated: {}", other),
    };
    OutgoingMail {
      to: order.contact_email.clone(),
      from: self.from.clone(),
      subject: format!("Order update: {}", new_status.as_str().to_uppercase()),
      html_body: format!(
        "<h3>Order status updated</h3><p>{}</p><p><strong>Order number:</strong> {}</p>",
        message, order.order_number
      ),
    }
  }

  async fn deliver(&self, mail: OutgoingMail) -> anyhow::Result<()> {
    let sent = self.transport.send(mail).await?;
    info!(message_id = %sent.message_id, to = %sent.to, subject = %sent.subject, preview = %sent.body_preview, "Email sent.");
    Ok(())
  }
}

#[async_trait]
impl Notifier for MailNotifier {
  async fn order_confirmed(&self, order: &Order) -> anyhow::Result<()> {
    self.deliver(self.confirmation_mail(order)).await
  }

  async fn admin_new_order(&self, order: &Order) -> anyhow::Result<()> {
    self.deliver(self.admin_mail(order)).await
  }

  async fn status_changed(&self, order: &Order, new_status: OrderStatus) -> anyhow::Result<()> {
    self.deliver(self.status_mail(order, new_status)).await
  }
}
