use crate::community::{
    CommunityService, CreateCommentInput, CreatePostInput, PostFilter, Topic,
};
use anyhow::Result;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Run the interactive CLI used for browsing and posting to the community.
pub async fn run_cli(service: CommunityService) -> Result<()> {
    let mut session = CliSession { service };

    println!("Sojourn community CLI ready. Type 'help' for a list of commands.");

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        print!("sojourn> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            println!("Exiting");
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let tokens = match shell_words::split(trimmed) {
            Ok(tokens) if !tokens.is_empty() => tokens,
            Ok(_) => continue,
            Err(err) => {
                println!("Unable to parse command: {err}");
                continue;
            }
        };

        match session.handle_command(&tokens) {
            Ok(LoopAction::Continue) => {}
            Ok(LoopAction::Exit) => break,
            Err(err) => {
                println!("Error: {err:#}");
            }
        }
    }

    Ok(())
}

struct CliSession {
    service: CommunityService,
}

enum LoopAction {
    Continue,
    Exit,
}

impl CliSession {
    fn handle_command(&mut self, tokens: &[String]) -> Result<LoopAction> {
        let command = tokens[0].as_str();
        match command {
            "help" => {
                self.print_help();
                Ok(LoopAction::Continue)
            }
            "posts" | "list" => {
                let topic = match tokens.get(1) {
                    Some(raw) => Some(raw.parse::<Topic>()?),
                    None => None,
                };
                self.list_posts(topic, None)?;
                Ok(LoopAction::Continue)
            }
            "search" => {
                if tokens.len() < 2 {
                    println!("Usage: search <text>");
                    return Ok(LoopAction::Continue);
                }
                self.list_posts(None, Some(tokens[1..].join(" ")))?;
                Ok(LoopAction::Continue)
            }
            "view" | "post" => {
                if tokens.len() < 2 {
                    println!("Usage: view <post_id>");
                    return Ok(LoopAction::Continue);
                }
                self.view_post(&tokens[1])?;
                Ok(LoopAction::Continue)
            }
            "new-post" => {
                if tokens.len() < 4 {
                    println!("Usage: new-post \"title\" \"body\" <topic>");
                    println!("Topics: {}", topic_list());
                    return Ok(LoopAction::Continue);
                }
                let topic = tokens[3].parse::<Topic>()?;
                self.new_post(tokens[1].clone(), tokens[2].clone(), topic)?;
                Ok(LoopAction::Continue)
            }
            "like" => {
                if tokens.len() < 2 {
                    println!("Usage: like <post_id>");
                    return Ok(LoopAction::Continue);
                }
                self.service.set_post_liked(&tokens[1], true)?;
                println!("Liked post {}", tokens[1]);
                Ok(LoopAction::Continue)
            }
            "unlike" => {
                if tokens.len() < 2 {
                    println!("Usage: unlike <post_id>");
                    return Ok(LoopAction::Continue);
                }
                self.service.set_post_liked(&tokens[1], false)?;
                println!("Unliked post {}", tokens[1]);
                Ok(LoopAction::Continue)
            }
            "comment" | "reply" => {
                if tokens.len() < 3 {
                    println!("Usage: comment <post_id> \"message\"");
                    return Ok(LoopAction::Continue);
                }
                self.add_comment(&tokens[1], tokens[2..].join(" "))?;
                Ok(LoopAction::Continue)
            }
            "topics" => {
                println!("Topics: {}", topic_list());
                Ok(LoopAction::Continue)
            }
            "quit" | "exit" => Ok(LoopAction::Exit),
            "clear" => {
                print!("\x1B[2J\x1B[1;1H");
                Ok(LoopAction::Continue)
            }
            other => {
                println!("Unknown command '{other}'. Type 'help' for a list of commands.");
                Ok(LoopAction::Continue)
            }
        }
    }

    fn print_help(&self) {
        println!("Available commands:");
        println!("  help                 Show this help message");
        println!("  posts [topic]        List posts, optionally filtered by topic");
        println!("  search TEXT          List posts whose title or body contains TEXT");
        println!("  view <post_id>       Display a post and its comments");
        println!("  new-post TITLE BODY TOPIC  Create a new post");
        println!("  like <post_id>       Mark a post as liked");
        println!("  unlike <post_id>     Remove your like from a post");
        println!("  comment <post_id> MSG  Add a comment to a post");
        println!("  topics               List the available topics");
        println!("  clear                Clear the screen");
        println!("  exit                 Quit the CLI");
    }

    fn list_posts(&self, topic: Option<Topic>, search: Option<String>) -> Result<()> {
        let posts = self.service.list_posts(&PostFilter { topic, search })?;
        if posts.is_empty() {
            println!("No posts matched. Use 'new-post' to start a discussion.");
            return Ok(());
        }
        println!("Posts:");
        for post in posts {
            println!(
                "  [{}] {} ({}, likes: {}, comments: {})",
                post.id,
                post.title,
                post.topic,
                post.likes,
                post.comments.len()
            );
        }
        Ok(())
    }

    fn view_post(&self, post_id: &str) -> Result<()> {
        let post = self.service.get_post(post_id)?;
        println!("{} [{}]", post.title, post.topic);
        println!("By {} at {}", post.author_name, post.created_at);
        println!("Likes: {}", post.likes);
        println!();
        println!("{}", post.body);
        if post.comments.is_empty() {
            println!();
            println!("(no comments yet)");
        }
        for (index, comment) in post.comments.iter().enumerate() {
            println!();
            println!(
                "Comment #{} by {} ({} likes)",
                index + 1,
                comment.author_name,
                comment.likes
            );
            println!("{}", comment.body);
        }
        Ok(())
    }

    fn new_post(&self, title: String, body: String, topic: Topic) -> Result<()> {
        let post = self.service.create_post(CreatePostInput {
            title,
            body,
            topic,
            author_id: "local_operator".into(),
            author_name: "Operator".into(),
            author_avatar: None,
            is_premium: false,
        })?;
        println!("Created post {}", post.id);
        Ok(())
    }

    fn add_comment(&self, post_id: &str, body: String) -> Result<()> {
        let comment = self.service.add_comment(
            post_id,
            CreateCommentInput {
                body,
                author_id: "local_operator".into(),
                author_name: "Operator".into(),
                author_avatar: None,
                is_premium: false,
            },
        )?;
        println!("Added comment {}", comment.id);
        Ok(())
    }
}

fn topic_list() -> String {
    Topic::ALL
        .iter()
        .map(Topic::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
