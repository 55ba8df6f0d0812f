// src/messenger/bot.rs

use super::{Keyboard, Messenger, ReplyKeyboard};
use anyhow::Context;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup,
};
use url::Url;

fn to_markup(kb: ReplyKeyboard) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = kb
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|b| {
                    let button = KeyboardButton::new(b.label);
                    if b.request_contact {
                        button.request(ButtonRequest::Contact)
                    } else {
                        button
                    }
                })
                .collect()
        })
        .collect();

    let markup = KeyboardMarkup::new(rows).resize_keyboard();
    if kb.one_time {
        markup.one_time_keyboard()
    } else {
        markup
    }
}

#[async_trait]
impl Messenger for Bot {
    async fn send_text(&self, chat_id: ChatId, text: String, keyboard: Keyboard) -> anyhow::Result<()> {
        let request = self.send_message(chat_id, text);
        match keyboard {
            Keyboard::Keep => request.await?,
            Keyboard::Remove => {
                request
                    .reply_markup(ReplyMarkup::KeyboardRemove(KeyboardRemove::new()))
                    .await?
            }
            Keyboard::Reply(kb) => request.reply_markup(ReplyMarkup::Keyboard(to_markup(kb))).await?,
        };
        Ok(())
    }

    async fn send_photo(&self, chat_id: ChatId, url: &str, caption: &str) -> anyhow::Result<()> {
        let url = Url::parse(url).with_context(|| format!("Invalid photo url {}", url))?;
        Requester::send_photo(self, chat_id, InputFile::url(url))
            .caption(caption)
            .await?;
        Ok(())
    }
}
